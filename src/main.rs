//! Wordhost - word guessing game server.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordhost::cli::{Cli, Command};
use wordhost::config::GameConfig;
use wordhost::llm_client::LlmClient;
use wordhost::providers::{LlmHintProvider, LlmWordProvider};
use wordhost::server::AppState;
use wordhost::session::SessionManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => run_server(host, port, config).await,
    }
}

/// Run the HTTP game server
async fn run_server(host: String, port: u16, config_path: PathBuf) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config(&config_path)?;
    info!(
        max_attempts = *config.max_attempts(),
        model = %config.llm_model(),
        "Configuration loaded"
    );

    let timeout = config.request_timeout();
    let words = Arc::new(LlmWordProvider::new(
        LlmClient::new(config.word_llm_config()?),
        timeout,
    ));
    let hints = Arc::new(LlmHintProvider::new(
        LlmClient::new(config.hint_llm_config()?),
        timeout,
    ));

    let sessions = SessionManager::new(config);
    let state = AppState::new(sessions, words, hints);

    info!(port, "Starting wordhost server");
    wordhost::server::serve(state, &host, port).await
}

fn load_config(path: &Path) -> Result<GameConfig> {
    if path.exists() {
        Ok(GameConfig::from_file(path)?)
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Ok(GameConfig::default())
    }
}
