//! `yard help [COMMAND]`

use crate::cli::{
    Command, CommandResult, Context, OptionParser, common_options, command_listing, find_command,
    parse_options,
};

/// Shows help for a single command, or lists all commands
#[derive(Debug, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    type Output = ();

    fn description(&self) -> &str {
        "Retrieves help for a command"
    }

    fn run(&mut self, ctx: &mut Context, mut args: Vec<String>) -> CommandResult {
        let mut opts = OptionParser::new("help");
        opts.banner("yard help [command]");
        common_options(&mut opts);
        parse_options(ctx, &mut opts, &mut args)?;

        match args.first().and_then(|name| find_command(name)) {
            Some(entry) => entry.run(ctx, vec!["--help".to_string()]),
            None => {
                print!("{}", command_listing());
                Ok(())
            }
        }
    }
}
