//! Command-line interface for yard
//!
//! The first argument names the command to run; everything after it belongs
//! to that command. Arguments that start with a switch go to the default
//! command. Each command parses its own switches on top of the common set
//! defined in [`command`].

pub mod command;
pub mod commands;
pub mod context;
pub mod error;
pub mod options;
mod output;

pub use command::{Command, ParseOutcome, common_options, parse_options};
pub use context::Context;
pub use error::{CommandError, CommandResult, ExitRequest};
pub use options::{OptionParser, Switch, Trigger};

/// Command run when no command name is given
pub const DEFAULT_COMMAND: &str = "help";

/// A command that can be dispatched by name
pub struct CommandEntry {
    pub name: &'static str,
    describe: fn() -> String,
    run: fn(&mut Context, Vec<String>) -> CommandResult,
}

impl CommandEntry {
    fn of<C: Command<Output = ()> + Default>(name: &'static str) -> Self {
        Self {
            name,
            describe: || C::default().description().to_string(),
            run: command::run::<C>,
        }
    }

    pub fn description(&self) -> String {
        (self.describe)()
    }

    pub fn run(&self, ctx: &mut Context, args: Vec<String>) -> CommandResult {
        (self.run)(ctx, args)
    }
}

/// All commands, sorted by name
pub fn commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry::of::<commands::config::ConfigCommand>("config"),
        CommandEntry::of::<commands::help::HelpCommand>("help"),
    ]
}

pub fn find_command(name: &str) -> Option<CommandEntry> {
    commands().into_iter().find(|entry| entry.name == name)
}

/// Text printed when no valid command was given
pub fn command_listing() -> String {
    let rows: Vec<(&str, String)> = commands()
        .iter()
        .map(|entry| (entry.name, entry.description()))
        .collect();

    let mut out = output::usage("yard <command> [options]");
    out.push_str(&output::listing("Commands:", &rows));
    out.push_str("\nSee 'yard help <command>' or 'yard <command> --help' for more information.\n");
    out
}

/// Top-level dispatcher
pub struct Cli;

impl Cli {
    /// Runs the command named by the first argument
    pub fn run(ctx: &mut Context, mut args: Vec<String>) -> CommandResult {
        let name = if args.first().is_some_and(|first| !first.starts_with('-')) {
            args.remove(0)
        } else {
            DEFAULT_COMMAND.to_string()
        };

        match find_command(&name) {
            Some(entry) => {
                tracing::debug!("Running command `{}`", entry.name);
                entry.run(ctx, args)
            }
            None => {
                tracing::debug!("Unknown command `{name}`");
                print!("{}", command_listing());
                Ok(())
            }
        }
    }
}
