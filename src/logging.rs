//! Logger state shared by every yard command
//!
//! The logger carries the two pieces of state that command-line flags are
//! allowed to change at runtime: the severity threshold and whether
//! backtraces are shown when an error is reported. When installed as the
//! global `tracing` subscriber, severity changes are pushed into a reloadable
//! filter so they take effect for the rest of the process.

use std::backtrace::BacktraceStatus;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, Registry, fmt as tracing_fmt, prelude::*, reload};

/// Ordered log severity, from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl Severity {
    /// Directive understood by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.as_str())
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Severity threshold and backtrace display flag
#[derive(Default)]
pub struct Logger {
    level: Severity,
    show_backtraces: bool,
    filter: Option<FilterHandle>,
}

impl Logger {
    /// Installs the global `tracing` subscriber and returns a logger bound to it.
    ///
    /// Output goes to stderr without targets; colors are enabled only when
    /// stderr is a terminal.
    pub fn install() -> Result<Self> {
        let level = Severity::default();
        let (filter, handle) = reload::Layer::new(level.filter());

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_fmt::layer()
                    .with_target(false)
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .with_writer(std::io::stderr),
            )
            .try_init()?;

        Ok(Self {
            level,
            show_backtraces: false,
            filter: Some(handle),
        })
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// Changes the severity threshold, updating the installed filter if any
    pub fn set_level(&mut self, level: Severity) {
        self.level = level;
        if let Some(handle) = &self.filter {
            if let Err(err) = handle.modify(|filter| *filter = level.filter()) {
                eprintln!("failed to update log level: {err}");
            }
        }
    }

    pub fn show_backtraces(&self) -> bool {
        self.show_backtraces
    }

    pub fn set_show_backtraces(&mut self, show: bool) {
        self.show_backtraces = show;
    }

    /// Logs an error with its cause chain, and its backtrace when enabled
    pub fn report(&self, err: &anyhow::Error) {
        tracing::error!("{err}");
        for cause in err.chain().skip(1) {
            tracing::error!("because: {cause}");
        }

        if !self.show_backtraces {
            return;
        }
        let backtrace = err.backtrace();
        match backtrace.status() {
            BacktraceStatus::Captured => tracing::error!("Stack trace:\n{backtrace}"),
            _ => tracing::error!("Stack trace unavailable, set RUST_BACKTRACE=1 to capture it"),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("show_backtraces", &self.show_backtraces)
            .field("installed", &self.filter.is_some())
            .finish()
    }
}
