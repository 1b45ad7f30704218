//! Command-line interface for wordhost.

use clap::{Parser, Subcommand};

/// Wordhost - word guessing game hosted by an LLM
#[derive(Parser, Debug)]
#[command(name = "wordhost")]
#[command(about = "Word guessing game served over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the game config TOML (defaults are used if missing)
        #[arg(short, long, default_value = "wordhost.toml")]
        config: std::path::PathBuf,
    },
}
