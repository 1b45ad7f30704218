//! Server configuration from TOML files and the environment.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunables for the game server.
///
/// Every numeric policy the game applies (attempt budget, word-uniqueness
/// retries, recent-word memory) is a field here rather than a constant.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Guesses allowed before the game is lost.
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// How many times to ask the word provider for an unused word before
    /// clearing the recent-word memory and accepting a repeat.
    #[serde(default = "default_word_retry_attempts")]
    word_retry_attempts: u32,

    /// How many past secret words to remember for de-duplication.
    #[serde(default = "default_recent_words_cap")]
    recent_words_cap: usize,

    /// Whether a hint request consumes an attempt.
    #[serde(default)]
    hint_counts_as_attempt: bool,

    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "claude-3-5-haiku").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature for word generation.
    #[serde(default = "default_word_temperature")]
    word_temperature: f32,

    /// Sampling temperature for hints.
    #[serde(default = "default_hint_temperature")]
    hint_temperature: f32,

    /// Timeout for a single provider call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_word_retry_attempts() -> u32 {
    3
}

fn default_recent_words_cap() -> usize {
    20
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_word_temperature() -> f32 {
    0.9
}

fn default_hint_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            word_retry_attempts: default_word_retry_attempts(),
            recent_words_cap: default_recent_words_cap(),
            hint_counts_as_attempt: false,
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            word_temperature: default_word_temperature(),
            hint_temperature: default_hint_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(model = %config.llm_model, "Config loaded successfully");
        Ok(config)
    }

    /// Timeout applied to each word/hint provider call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// LLM configuration for word generation.
    ///
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY in the environment.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn word_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        Ok(LlmConfig::new(
            self.llm_provider,
            self.api_key()?,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.word_temperature,
        ))
    }

    /// LLM configuration for hint generation.
    ///
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY in the environment.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn hint_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        Ok(LlmConfig::new(
            self.llm_provider,
            self.api_key()?,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.hint_temperature,
        ))
    }

    fn api_key(&self) -> Result<String, ConfigError> {
        match self.llm_provider {
            LlmProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            }),
            LlmProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            }),
        }
    }

    /// Overrides the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Overrides the word-uniqueness retry count.
    #[must_use]
    pub fn with_word_retry_attempts(mut self, word_retry_attempts: u32) -> Self {
        self.word_retry_attempts = word_retry_attempts;
        self
    }

    /// Overrides the recent-word memory size.
    #[must_use]
    pub fn with_recent_words_cap(mut self, recent_words_cap: usize) -> Self {
        self.recent_words_cap = recent_words_cap;
        self
    }

    /// Overrides whether a hint request consumes an attempt.
    #[must_use]
    pub fn with_hint_counts_as_attempt(mut self, hint_counts_as_attempt: bool) -> Self {
        self.hint_counts_as_attempt = hint_counts_as_attempt;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
