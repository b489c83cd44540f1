//! Base contract shared by every yard command
//!
//! A command builds its own [`OptionParser`], registers its switches, adds
//! the common switches with [`common_options`], then consumes its arguments
//! with [`parse_options`], which degrades unknown switches to a warning.

use super::context::Context;
use super::error::{CommandError, CommandResult, ExitRequest};
use super::options::{OptionParser, Switch};
use crate::logging::Severity;
use crate::parser::ParserType;

/// A command-line utility
pub trait Command {
    /// Value handed back to the caller of [`run`]
    type Output;

    /// One-line summary shown in the command listing
    fn description(&self) -> &str {
        ""
    }

    /// Runs the command with its arguments, program and command name excluded
    fn run(&mut self, ctx: &mut Context, args: Vec<String>) -> CommandResult<Self::Output>;
}

/// Creates a fresh `C` and runs it
pub fn run<C: Command + Default>(ctx: &mut Context, args: Vec<String>) -> CommandResult<C::Output> {
    C::default().run(ctx, args)
}

/// How a call to [`parse_options`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every argument was understood
    Parsed,
    /// Parsing stopped at this unknown switch; it was logged as a warning
    InvalidOption(String),
}

/// Appends the switches every command supports.
///
/// The block is appended as-is on each call; calling this twice on the same
/// parser registers everything twice.
pub fn common_options(opts: &mut OptionParser) {
    opts.separator("");
    opts.separator("Other options:");

    opts.on(
        Switch::new("load")
            .short('e')
            .long("load")
            .value("FILE")
            .help("A Ruby script to load before the source tree is parsed."),
        |ctx, trigger| {
            let file = trigger.value.unwrap_or_default();
            let feature = file.strip_suffix(".rb").unwrap_or(file);
            if !ctx.loader.require(feature)? {
                tracing::error!(
                    "The file `{file}' was already loaded, perhaps you need to specify the absolute path to avoid name collisions."
                );
                return Err(ExitRequest::success().into());
            }
            Ok(())
        },
    );
    opts.on(
        Switch::new("legacy")
            .long("legacy")
            .help("Use old style Ruby parser and handlers. Always on in 1.8.x."),
        |ctx, _| {
            ctx.parser_type = ParserType::Ruby18;
            Ok(())
        },
    );

    opts.on_tail(
        Switch::new("quiet").short('q').long("quiet").help("Show no warnings."),
        |ctx, _| {
            ctx.logger.set_level(Severity::Error);
            Ok(())
        },
    );
    opts.on_tail(
        Switch::new("verbose").long("verbose").help("Show more information."),
        |ctx, _| {
            ctx.logger.set_level(Severity::Info);
            Ok(())
        },
    );
    opts.on_tail(
        Switch::new("debug").long("debug").help("Show debugging information."),
        |ctx, _| {
            ctx.logger.set_level(Severity::Debug);
            Ok(())
        },
    );
    opts.on_tail(
        Switch::new("backtrace").long("backtrace").help("Show stack traces"),
        |ctx, _| {
            ctx.logger.set_show_backtraces(true);
            Ok(())
        },
    );
    opts.on_tail(
        Switch::new("version").short('v').long("version").help("Show version."),
        |_, _| Err(ExitRequest::success().with_output(version_banner()).into()),
    );
    opts.on_tail(
        Switch::new("help").short('h').long("help").help("Show this help."),
        |_, trigger| Err(ExitRequest::success().with_output(trigger.help).into()),
    );
}

/// Parses `args` in place, logging an unknown switch instead of failing.
///
/// Parsing stops at the first unknown switch, so at most one warning is
/// logged per call. Exit requests and other failures raised by switch
/// handlers are returned unchanged.
pub fn parse_options(
    ctx: &mut Context,
    opts: &mut OptionParser,
    args: &mut Vec<String>,
) -> CommandResult<ParseOutcome> {
    match opts.parse(ctx, args) {
        Ok(()) => Ok(ParseOutcome::Parsed),
        Err(CommandError::InvalidOption(option)) => {
            tracing::warn!("Unrecognized/invalid option: {option}");
            Ok(ParseOutcome::InvalidOption(option))
        }
        Err(err) => Err(err),
    }
}

/// `yard <version>`, as printed by `--version`
pub fn version_banner() -> String {
    format!("yard {}", crate::VERSION)
}
