//! State shared by every command for the lifetime of the process

use crate::config::YardConfig;
use crate::loader::{FileLoader, ScriptLoader};
use crate::logging::Logger;
use crate::parser::ParserType;

/// Context passed to all commands and to every option handler
pub struct Context {
    /// Severity threshold and backtrace display
    pub logger: Logger,
    /// Loader used by `--load`
    pub loader: Box<dyn ScriptLoader>,
    /// Source parser selected for the documentation pipeline
    pub parser_type: ParserType,
}

impl Context {
    pub fn new(logger: Logger, loader: Box<dyn ScriptLoader>) -> Self {
        Self {
            logger,
            loader,
            parser_type: ParserType::default(),
        }
    }

    /// Builds a context seeded from configuration; command-line flags applied
    /// later take precedence.
    pub fn from_config(config: &YardConfig, mut logger: Logger) -> Self {
        logger.set_level(config.log_level);
        logger.set_show_backtraces(config.backtrace);

        Self {
            logger,
            loader: Box::new(FileLoader::new(config.effective_load_path())),
            parser_type: config.parser,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Logger::default(), Box::new(FileLoader::default()))
    }
}
