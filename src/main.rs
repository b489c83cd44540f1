use std::process::ExitCode;

use yard::{Cli, CommandError, Context, Logger, YardConfig};

fn main() -> ExitCode {
    let logger = Logger::install().unwrap_or_else(|err| {
        eprintln!("failed to install logger: {err}");
        Logger::default()
    });

    let config = YardConfig::load().unwrap_or_else(|err| {
        tracing::warn!("Ignoring invalid configuration: {err}");
        YardConfig::default()
    });

    let mut ctx = Context::from_config(&config, logger);
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match Cli::run(&mut ctx, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Exit(exit)) => {
            if let Some(output) = exit.output() {
                println!("{}", output.trim_end());
            }
            ExitCode::from(exit.code())
        }
        Err(err) => {
            ctx.logger.report(&anyhow::Error::from(err));
            ExitCode::FAILURE
        }
    }
}
