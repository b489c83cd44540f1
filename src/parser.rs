//! Source parser selection

use serde::{Deserialize, Serialize};

/// Which Ruby source parser and handler set the documentation pipeline uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserType {
    /// Modern parser and handlers
    #[default]
    Ruby,
    /// Old style parser and handlers, selected with `--legacy`
    Ruby18,
}
