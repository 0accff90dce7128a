use std::process::ExitCode;

use clap::Parser;
use ramify::cli::{Cli, Command};
use ramify::{Config, SystemPlatform};

/// Exit code for a config file that cannot be read or parsed
const CONFIG_ERROR_EXIT: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };
    let platform = SystemPlatform::with_tool_paths(config.tool_paths.clone());

    let result = match &cli.command {
        Command::Ramify { server } => ramify::ramify(&config, &platform, server),
        Command::Unramify { server } => ramify::unramify(&config, &platform, server),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(server = cli.command.server(), error = ?e, "Operation failed");
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
