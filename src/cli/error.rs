//! Errors and early exits raised while running a command

use thiserror::Error;

use crate::loader::LoadError;

pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Request to stop the process once control is back in `main`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRequest {
    code: u8,
    output: Option<String>,
}

impl ExitRequest {
    /// Exit with status 0 and nothing more to print
    pub fn success() -> Self {
        Self {
            code: 0,
            output: None,
        }
    }

    /// Text printed to stdout before exiting
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("exit requested with status {}", .0.code)]
    Exit(ExitRequest),

    /// A switch the option parser does not know about
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ExitRequest> for CommandError {
    fn from(exit: ExitRequest) -> Self {
        CommandError::Exit(exit)
    }
}
