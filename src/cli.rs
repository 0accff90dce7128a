//! Command-line surface: `ramify (ramify|unramify) <server>`

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ramify",
    version,
    about = "Move a server's state between its tar archive and a tmpfs mount"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mount a tmpfs for the server and extract its archive into it
    Ramify {
        /// Server identifier
        server: String,
    },
    /// Pack the server's tmpfs back into its archive and unmount it
    Unramify {
        /// Server identifier
        server: String,
    },
}

impl Command {
    pub fn server(&self) -> &str {
        match self {
            Command::Ramify { server } | Command::Unramify { server } => server,
        }
    }
}

impl Cli {
    /// Default tracing level for the requested verbosity
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}
