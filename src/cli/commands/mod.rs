//! Command implementations bundled with yard
//!
//! Each command is organized into its own module.

pub mod config;
pub mod help;
