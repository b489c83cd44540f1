//! `yard config [--json]`
//!
//! Prints the settings in effect once configuration files, environment
//! variables and the common switches have all been applied.

use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::{
    Command, CommandResult, Context, OptionParser, Switch, common_options, parse_options,
};
use crate::logging::Severity;
use crate::parser::ParserType;

/// Snapshot of the settings a command would run with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveSettings {
    pub log_level: Severity,
    pub backtrace: bool,
    pub parser: ParserType,
    pub scripts: Vec<PathBuf>,
}

impl EffectiveSettings {
    pub fn capture(ctx: &Context) -> Self {
        Self {
            log_level: ctx.logger.level(),
            backtrace: ctx.logger.show_backtraces(),
            parser: ctx.parser_type,
            scripts: ctx
                .loader
                .loaded()
                .iter()
                .map(|script| script.path.clone())
                .collect(),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("Failed to serialize settings as TOML")
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize settings as JSON")
    }
}

#[derive(Debug, Default)]
pub struct ConfigCommand;

impl ConfigCommand {
    fn options() -> OptionParser {
        let mut opts = OptionParser::new("config");
        opts.banner("yard config [options]");
        opts.separator("");
        opts.separator("Output options:");
        opts.define(
            Switch::new("json")
                .long("json")
                .help("Print the settings as JSON instead of TOML."),
        );
        common_options(&mut opts);
        opts
    }
}

impl Command for ConfigCommand {
    type Output = ();

    fn description(&self) -> &str {
        "Shows the effective configuration"
    }

    fn run(&mut self, ctx: &mut Context, mut args: Vec<String>) -> CommandResult {
        let mut opts = Self::options();
        parse_options(ctx, &mut opts, &mut args)?;

        if !args.is_empty() {
            tracing::warn!("Ignoring extra arguments: {}", args.join(" "));
        }

        let settings = EffectiveSettings::capture(ctx);
        if opts.flag("json") {
            println!("{}", settings.to_json()?);
        } else {
            print!("{}", settings.to_toml()?);
        }
        Ok(())
    }
}
