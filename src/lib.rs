//! # yard - command-line front end for the YARD documentation tool
//!
//! This crate holds the command layer shared by every `yard` utility:
//!
//! - **Common switches**: every command accepts `--load`, `--legacy`,
//!   `--quiet`, `--verbose`, `--debug`, `--backtrace`, `--version` and
//!   `--help` on top of its own options
//! - **Lenient parsing**: an unknown switch is reported as a warning and
//!   the command carries on
//! - **Layered configuration**: defaults, `~/.yard/config.toml`, `yard.toml`
//!   and `YARD_` environment variables seed the command context
//!
//! ## Quick Start
//!
//! ```bash
//! # List the available commands
//! yard help
//!
//! # Show the settings a command would run with
//! yard config --debug --load ext/handlers.rb
//! ```

pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
pub mod parser;

#[cfg(test)]
mod testing;

pub use cli::{Cli, Command, CommandError, CommandResult, Context};
pub use config::YardConfig;
pub use logging::{Logger, Severity};

/// Version reported by `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
