//! Option parser with immediately executed switch handlers
//!
//! Commands describe their switches in registration order, interleaved with
//! separator lines, and may attach a handler to each switch. Parsing consumes
//! recognized switches from the argument vector in place and runs the
//! handlers left to right as their switches appear on the command line.
//! Positional operands stay behind in the vector.
//!
//! Matching and help rendering are delegated to `clap`.

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, value_parser};

use super::context::Context;
use super::error::{CommandError, CommandResult};

/// Hidden positional collecting the operands left after parsing
const OPERANDS: &str = "__operands";

/// Callback run when its switch is recognized
pub type Handler = Box<dyn Fn(&mut Context, Trigger<'_>) -> CommandResult>;

/// What a handler receives about the occurrence that fired it
#[derive(Debug, Clone, Copy)]
pub struct Trigger<'a> {
    /// The switch's argument, for switches that take one
    pub value: Option<&'a str>,
    /// Full help text of the parser being run
    pub help: &'a str,
}

/// Definition of a single command-line switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    name: String,
    short: Option<char>,
    long: Option<String>,
    value_name: Option<String>,
    help: String,
}

impl Switch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            long: None,
            value_name: None,
            help: String::new(),
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Makes the switch take a single argument, shown as `value_name` in help
    pub fn value(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_flag(&self) -> Option<char> {
        self.short
    }

    pub fn long_flag(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn takes_value(&self) -> bool {
        self.value_name.is_some()
    }

    /// Whether both switches would answer to the same name or flag
    fn collides_with(&self, other: &Switch) -> bool {
        self.name == other.name
            || (self.short.is_some() && self.short == other.short)
            || (self.long.is_some() && self.long == other.long)
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).help(self.help.clone());
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }

        match &self.value_name {
            Some(value_name) => arg
                .value_name(value_name.clone())
                .num_args(1)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
            // Appended rather than counted so every occurrence keeps its index
            None => arg
                .num_args(0)
                .default_missing_value("")
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
        }
    }
}

enum Entry {
    Separator(String),
    Switch {
        switch: Switch,
        handler: Option<Handler>,
    },
}

/// Ordered collection of switches owned by a single command invocation
pub struct OptionParser {
    program: String,
    banner: Option<String>,
    top: Vec<Entry>,
    tail: Vec<Entry>,
    matches: Option<ArgMatches>,
}

impl OptionParser {
    /// Creates an empty parser for the `yard <program>` command
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            banner: None,
            top: Vec::new(),
            tail: Vec::new(),
            matches: None,
        }
    }

    /// Sets the usage line shown at the top of the help text
    pub fn banner(&mut self, banner: impl Into<String>) {
        self.banner = Some(banner.into());
    }

    /// Appends a separator line. A line ending in `:` starts a new help section.
    pub fn separator(&mut self, text: impl Into<String>) {
        self.top.push(Entry::Separator(text.into()));
    }

    /// Registers a switch whose value is read back after parsing
    pub fn define(&mut self, switch: Switch) {
        self.top.push(Entry::Switch {
            switch,
            handler: None,
        });
    }

    /// Registers a switch with a handler run as soon as it is recognized
    pub fn on<F>(&mut self, switch: Switch, handler: F)
    where
        F: Fn(&mut Context, Trigger<'_>) -> CommandResult + 'static,
    {
        self.top.push(Entry::Switch {
            switch,
            handler: Some(Box::new(handler)),
        });
    }

    /// Like [`OptionParser::on`], but the switch is listed after every other one
    pub fn on_tail<F>(&mut self, switch: Switch, handler: F)
    where
        F: Fn(&mut Context, Trigger<'_>) -> CommandResult + 'static,
    {
        self.tail.push(Entry::Switch {
            switch,
            handler: Some(Box::new(handler)),
        });
    }

    /// All registered switches in display order, duplicates included
    pub fn switches(&self) -> impl Iterator<Item = &Switch> {
        self.entries().filter_map(|entry| match entry {
            Entry::Switch { switch, .. } => Some(switch),
            Entry::Separator(_) => None,
        })
    }

    /// All separator lines in registration order
    pub fn separators(&self) -> impl Iterator<Item = &str> {
        self.entries().filter_map(|entry| match entry {
            Entry::Separator(text) => Some(text.as_str()),
            Entry::Switch { .. } => None,
        })
    }

    /// Renders the full help text
    pub fn help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Whether a handler-less flag was given in the last successful parse
    pub fn flag(&self, name: &str) -> bool {
        self.matches
            .as_ref()
            .and_then(|matches| matches.try_get_many::<String>(name).ok().flatten())
            .is_some_and(|mut occurrences| occurrences.next().is_some())
    }

    /// Values given for a handler-less switch in the last successful parse
    pub fn values(&self, name: &str) -> Vec<String> {
        self.matches
            .as_ref()
            .and_then(|matches| matches.try_get_many::<String>(name).ok().flatten())
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// Consumes recognized switches from `args`, running their handlers.
    ///
    /// On success only the operands are left in `args`. When an unknown
    /// switch is found, the switches before it are still handled, everything
    /// up to and including it is removed (operands excepted), the arguments
    /// after it are left untouched, and [`CommandError::InvalidOption`] is
    /// returned. Operands seen before the unknown switch are kept rather than
    /// dropped. In a cluster such as `-qZ` the letters before the unknown one
    /// are still handled and only `-Z` is reported. Handler errors, including
    /// exit requests, stop parsing immediately.
    pub fn parse(&mut self, ctx: &mut Context, args: &mut Vec<String>) -> CommandResult {
        let mut command = self.command();
        let help = command.render_help().to_string();

        let (matches, consumed, invalid) = match command.try_get_matches_from_mut(args.iter()) {
            Ok(matches) => (matches, args.len(), None),
            Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                let Some(at) = first_unknown(&mut command, args) else {
                    return Err(err.into());
                };
                let (known, invalid) = split_cluster(&command, &args[at]);
                let matches =
                    command.try_get_matches_from_mut(args[..at].iter().cloned().chain(known))?;
                (matches, at + 1, Some(invalid))
            }
            Err(err) => return Err(err.into()),
        };

        self.dispatch(ctx, &matches, &help)?;

        let rest = args.split_off(consumed);
        *args = matches
            .get_many::<String>(OPERANDS)
            .map(|operands| operands.cloned().collect())
            .unwrap_or_default();
        args.extend(rest);
        self.matches = Some(matches);

        match invalid {
            Some(option) => Err(CommandError::InvalidOption(option)),
            None => Ok(()),
        }
    }

    fn entries(&self) -> impl DoubleEndedIterator<Item = &Entry> {
        self.top.iter().chain(self.tail.iter())
    }

    /// Entries in display order without switches shadowed by a later
    /// registration of the same name or flag.
    fn layout(&self) -> Vec<&Entry> {
        let mut kept: Vec<&Entry> = Vec::new();
        for entry in self.entries().rev() {
            if let Entry::Switch { switch, .. } = entry {
                let shadowed = kept.iter().any(|kept| {
                    matches!(kept, Entry::Switch { switch: later, .. } if later.collides_with(switch))
                });
                if shadowed {
                    continue;
                }
            }
            kept.push(entry);
        }
        kept.reverse();
        kept
    }

    fn command(&self) -> clap::Command {
        let usage = self
            .banner
            .clone()
            .unwrap_or_else(|| format!("yard {} [options]", self.program));

        let mut command = clap::Command::new(self.program.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .infer_long_args(true)
            .override_usage(usage)
            .arg(
                Arg::new(OPERANDS)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(String))
                    .hide(true),
            );

        for entry in self.layout() {
            command = match entry {
                Entry::Separator(text) => match text.trim().strip_suffix(':') {
                    Some(heading) if !heading.is_empty() => {
                        command.next_help_heading(heading.to_string())
                    }
                    _ => command,
                },
                Entry::Switch { switch, .. } => command.arg(switch.to_arg()),
            };
        }
        command
    }

    /// Runs the handlers of every switch given on the command line, in the
    /// order the switches appeared.
    fn dispatch(&self, ctx: &mut Context, matches: &ArgMatches, help: &str) -> CommandResult {
        let mut pending: Vec<(usize, &Handler, Option<&str>)> = Vec::new();

        for entry in self.layout() {
            let Entry::Switch {
                switch,
                handler: Some(handler),
            } = entry
            else {
                continue;
            };
            if matches.value_source(switch.name()) != Some(ValueSource::CommandLine) {
                continue;
            }
            let Some(indices) = matches.indices_of(switch.name()) else {
                continue;
            };

            if switch.takes_value() {
                let values = matches.get_many::<String>(switch.name()).into_iter().flatten();
                pending.extend(
                    indices
                        .zip(values)
                        .map(|(index, value)| (index, handler, Some(value.as_str()))),
                );
            } else {
                pending.extend(indices.map(|index| (index, handler, None)));
            }
        }

        pending.sort_by_key(|(index, ..)| *index);
        for (_, handler, value) in pending {
            handler(ctx, Trigger { value, help })?;
        }
        Ok(())
    }
}

/// Position of the first argument `clap` rejects as an unknown switch
fn first_unknown(command: &mut clap::Command, args: &[String]) -> Option<usize> {
    (0..args.len()).find(|&end| {
        matches!(
            command.try_get_matches_from_mut(args[..=end].iter()),
            Err(err) if err.kind() == ErrorKind::UnknownArgument
        )
    })
}

/// Splits a short-switch cluster like `-qZ` into the part that can still be
/// parsed (`-q`) and the first unknown letter (`-Z`).
///
/// Anything that is not a cluster, or whose first letter is already unknown,
/// is reported whole.
fn split_cluster(command: &clap::Command, arg: &str) -> (Option<String>, String) {
    let Some(letters) = arg
        .strip_prefix('-')
        .filter(|letters| !letters.starts_with('-') && letters.chars().count() > 1)
    else {
        return (None, arg.to_string());
    };

    let known = |letter: char| command.get_arguments().any(|candidate| candidate.get_short() == Some(letter));
    match letters.char_indices().find(|&(_, letter)| !known(letter)) {
        Some((at, letter)) if at > 0 => (Some(format!("-{}", &letters[..at])), format!("-{letter}")),
        _ => (None, arg.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::cli::error::ExitRequest;
    use crate::logging::Severity;
    use crate::testing::{args, test_context};

    fn set_level(level: Severity) -> impl Fn(&mut Context, Trigger<'_>) -> CommandResult {
        move |ctx, _| {
            ctx.logger.set_level(level);
            Ok(())
        }
    }

    fn parser() -> OptionParser {
        let mut opts = OptionParser::new("stats");
        opts.define(Switch::new("list-undoc").long("list-undoc").help("List undocumented objects"));
        opts.define(Switch::new("query").long("query").value("QUERY").help("Only show matching objects"));
        opts.separator("");
        opts.separator("Output options:");
        opts.on_tail(Switch::new("debug").long("debug").help("Show debugging information."), set_level(Severity::Debug));
        opts.on(Switch::new("quiet").short('q').long("quiet").help("Show no warnings."), set_level(Severity::Error));
        opts
    }

    #[test]
    fn test_operands_are_left_in_place() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();
        let mut argv = args(&["lib/a.rb", "--list-undoc", "lib/b.rb", "--query", "@api", "--", "-weird.rb"]);

        opts.parse(&mut ctx, &mut argv).unwrap();

        assert_eq!(argv, args(&["lib/a.rb", "lib/b.rb", "-weird.rb"]));
        assert!(opts.flag("list-undoc"));
        assert_eq!(opts.values("query"), vec!["@api".to_string()]);
    }

    #[test]
    fn test_unset_switches_read_back_empty() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();
        let mut argv = Vec::new();

        opts.parse(&mut ctx, &mut argv).unwrap();

        assert!(!opts.flag("list-undoc"));
        assert!(opts.values("query").is_empty());
        assert!(!opts.flag("not-registered"));
    }

    #[test]
    fn test_handlers_run_in_command_line_order() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        opts.parse(&mut ctx, &mut args(&["--debug", "-q"])).unwrap();
        assert_eq!(ctx.logger.level(), Severity::Error);

        opts.parse(&mut ctx, &mut args(&["-q", "--debug"])).unwrap();
        assert_eq!(ctx.logger.level(), Severity::Debug);
    }

    #[test]
    fn test_absent_switches_do_not_fire() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        opts.parse(&mut ctx, &mut args(&["file.rb"])).unwrap();

        assert_eq!(ctx.logger.level(), Severity::Warn);
    }

    #[test]
    fn test_unknown_switch_stops_parsing() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();
        let mut argv = args(&["a.rb", "-q", "--bogus", "--debug", "b.rb"]);

        let err = opts.parse(&mut ctx, &mut argv).unwrap_err();

        assert!(matches!(err, CommandError::InvalidOption(ref option) if option == "--bogus"));
        assert_eq!(argv, args(&["a.rb", "--debug", "b.rb"]));
        assert_eq!(ctx.logger.level(), Severity::Error);
    }

    #[test]
    fn test_repeated_switch_fires_at_every_position() {
        let (mut ctx, _) = test_context();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut opts = OptionParser::new("graph");
        for name in ["quiet", "verbose"] {
            let fired = Rc::clone(&fired);
            opts.on(Switch::new(name).long(name), move |_, _| {
                fired.borrow_mut().push(name);
                Ok(())
            });
        }

        opts.parse(&mut ctx, &mut args(&["--quiet", "--verbose", "--quiet"])).unwrap();

        assert_eq!(*fired.borrow(), vec!["quiet", "verbose", "quiet"]);
    }

    #[test]
    fn test_repeated_flag_reads_back_set() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        opts.parse(&mut ctx, &mut args(&["--list-undoc", "--list-undoc"])).unwrap();

        assert!(opts.flag("list-undoc"));
    }

    #[test]
    fn test_unknown_letter_in_cluster_keeps_known_prefix() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();
        let mut argv = args(&["-qZ", "x"]);

        let err = opts.parse(&mut ctx, &mut argv).unwrap_err();

        assert!(matches!(err, CommandError::InvalidOption(ref option) if option == "-Z"));
        assert_eq!(ctx.logger.level(), Severity::Error);
        assert_eq!(argv, args(&["x"]));
    }

    #[test]
    fn test_cluster_starting_with_unknown_letter_is_reported_whole() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        let err = opts.parse(&mut ctx, &mut args(&["-Zq"])).unwrap_err();

        assert!(matches!(err, CommandError::InvalidOption(ref option) if option == "-Zq"));
        assert_eq!(ctx.logger.level(), Severity::Warn);
    }

    #[test]
    fn test_unique_long_prefix_is_accepted() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        opts.parse(&mut ctx, &mut args(&["--qui", "--list"])).unwrap();

        assert_eq!(ctx.logger.level(), Severity::Error);
        assert!(opts.flag("list-undoc"));
    }

    #[test]
    fn test_ambiguous_long_prefix_is_unknown() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        let err = opts.parse(&mut ctx, &mut args(&["--qu"])).unwrap_err();

        assert!(matches!(err, CommandError::InvalidOption(ref option) if option == "--qu"));
    }

    #[test]
    fn test_missing_switch_argument_is_a_usage_error() {
        let (mut ctx, _) = test_context();
        let mut opts = parser();

        let err = opts.parse(&mut ctx, &mut args(&["--query"])).unwrap_err();

        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[test]
    fn test_tail_switches_render_last() {
        let opts = parser();
        let help = opts.help();

        let positions: Vec<usize> = ["--list-undoc", "--query", "--quiet", "--debug"]
            .iter()
            .map(|flag| help.find(flag).unwrap_or_else(|| panic!("{flag} missing from help")))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(help.contains("Output options:"));
        assert!(help.contains("yard stats [options]"));
    }

    #[test]
    fn test_banner_replaces_usage() {
        let mut opts = parser();
        opts.banner("yard stats [options] [source_files]");

        assert!(opts.help().contains("yard stats [options] [source_files]"));
    }

    #[test]
    fn test_help_is_passed_to_handlers() {
        let (mut ctx, _) = test_context();
        let mut opts = OptionParser::new("graph");
        opts.on_tail(Switch::new("help").short('h').long("help").help("Show this help."), |_, trigger| {
            Err(ExitRequest::success().with_output(trigger.help).into())
        });

        let err = opts.parse(&mut ctx, &mut args(&["-h"])).unwrap_err();

        let CommandError::Exit(exit) = err else {
            panic!("expected exit, got {err:?}");
        };
        assert!(exit.output().unwrap().contains("Show this help."));
    }

    #[test]
    fn test_later_registration_wins() {
        let (mut ctx, _) = test_context();
        let mut opts = OptionParser::new("graph");
        opts.on(Switch::new("quiet").long("quiet"), set_level(Severity::Error));
        opts.on(Switch::new("quiet").long("quiet"), set_level(Severity::Info));

        opts.parse(&mut ctx, &mut args(&["--quiet"])).unwrap();

        assert_eq!(opts.switches().count(), 2);
        assert_eq!(ctx.logger.level(), Severity::Info);
    }
}
