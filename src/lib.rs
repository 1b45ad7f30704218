//! Wordhost library - LLM-hosted word-guessing game
//!
//! A browser page posts guesses to a small set of HTTP endpoints, a
//! language-model call produces the secret word and subsequent hints, and a
//! session state machine tracks attempts and win/lose conditions.
//!
//! # Architecture
//!
//! - **Game**: the per-session state machine (start, guess, hint, end)
//! - **Providers**: word and hint capabilities backed by LLM APIs (OpenAI, Anthropic)
//! - **Server**: axum HTTP surface with keyed, serialized sessions
//! - **Config**: TOML file plus environment variables
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordhost::config::GameConfig;
//! use wordhost::llm_client::LlmClient;
//! use wordhost::providers::{LlmHintProvider, LlmWordProvider};
//! use wordhost::server::AppState;
//! use wordhost::session::SessionManager;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let timeout = config.request_timeout();
//! let words = Arc::new(LlmWordProvider::new(
//!     LlmClient::new(config.word_llm_config()?),
//!     timeout,
//! ));
//! let hints = Arc::new(LlmHintProvider::new(
//!     LlmClient::new(config.hint_llm_config()?),
//!     timeout,
//! ));
//! let state = AppState::new(SessionManager::new(config), words, hints);
//! wordhost::server::serve(state, "127.0.0.1", 3000).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod game;
pub mod llm_client;
pub mod providers;
pub mod server;
pub mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Game state machine
pub use game::{GameError, GameReply, GameSession, GameStatus};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Providers
pub use providers::{
    HintProvider, LlmHintProvider, LlmWordProvider, ProviderError, WordProvider,
};

// Crate-level exports - HTTP server
pub use server::{AppState, GuessRequest, GuessResponse, MessageResponse};

// Crate-level exports - Session management
pub use session::{SessionHandle, SessionId, SessionManager};
