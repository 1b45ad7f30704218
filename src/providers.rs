//! Word and hint provider seams, and their LLM-backed implementations.
//!
//! The state machine only knows the two traits; everything about prompts,
//! models, and timeouts lives here.

use crate::llm_client::LlmClient;
use async_trait::async_trait;
use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Failure of a word or hint backend.
#[derive(Debug, Clone, Display, Error)]
#[display("Provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Produces a candidate secret word for a new game.
#[async_trait]
pub trait WordProvider: Send + Sync {
    /// Returns a candidate word, given recently used words to avoid.
    ///
    /// The caller handles uniqueness retries; a single call either yields a
    /// word or fails.
    async fn generate(&self, excluding: &[String]) -> Result<String, ProviderError>;
}

/// Produces a hint for the current word without revealing it.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Returns a natural-language hint for `secret_word` given the guesses
    /// made so far (latest last).
    async fn hint(&self, secret_word: &str, history: &[String]) -> Result<String, ProviderError>;
}

const WORD_SYSTEM_PROMPT: &str =
    "You are a word generator for a word guessing game. Provide only a single word.";

const WORD_PROMPTS: [&str; 4] = [
    "Generate a random common noun (object, animal, food, etc.) that would be fun to guess in a word game. Respond with just the word.",
    "Give me a simple word from one of these categories: fruits, animals, household items, or clothing. Respond with just the word.",
    "Provide a common English word that a child would know, suitable for a guessing game. Respond with just the word.",
    "Generate a random word from everyday life (could be food, object, animal, etc.). Keep it simple and respond with just the word.",
];

const HINT_SYSTEM_PROMPT: &str = r#"You are a word guessing game assistant. Follow these strict rules:
1. NEVER reveal the target word under any circumstances, unless the player says "I give up"
2. NEVER use the target word in your responses, even as part of another word
3. NEVER directly confirm if any part of the guess is correct
4. Instead, provide clever hints about:
   - General category (animal, object, food, etc.)
   - Size comparison (bigger, smaller)
   - Common uses or characteristics
   - First letter (only if player is struggling after multiple guesses)
5. Keep responses brief, encouraging, and fun
6. If the guess is completely wrong, guide them in a new direction
7. If they're getting closer, encourage them without specifying which parts are correct"#;

/// Word provider backed by the chat-completion client.
#[derive(Debug, Clone)]
pub struct LlmWordProvider {
    client: LlmClient,
    timeout: Duration,
}

impl LlmWordProvider {
    /// Creates a provider over the given client with a per-call timeout.
    #[instrument(skip(client))]
    pub fn new(client: LlmClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl WordProvider for LlmWordProvider {
    #[instrument(skip(self, excluding), fields(excluded = excluding.len()))]
    async fn generate(&self, excluding: &[String]) -> Result<String, ProviderError> {
        let mut prompt = WORD_PROMPTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(WORD_PROMPTS[0])
            .to_string();
        if !excluding.is_empty() {
            prompt.push_str(&format!(" Avoid these words: {}.", excluding.join(", ")));
        }

        let reply = tokio::time::timeout(
            self.timeout,
            self.client.generate(WORD_SYSTEM_PROMPT, &prompt),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?self.timeout, "word generation timed out");
            ProviderError::new("word generation timed out")
        })?
        .map_err(|e| ProviderError::new(format!("word generation failed: {}", e)))?;

        let word = normalize_word(&reply);
        if word.is_empty() {
            error!(reply = %reply, "word backend returned no usable word");
            return Err(ProviderError::new("word backend returned no usable word"));
        }

        debug!(word = %word, "Generated secret word");
        Ok(word)
    }
}

/// Hint provider backed by the chat-completion client.
#[derive(Debug, Clone)]
pub struct LlmHintProvider {
    client: LlmClient,
    timeout: Duration,
}

impl LlmHintProvider {
    /// Creates a provider over the given client with a per-call timeout.
    #[instrument(skip(client))]
    pub fn new(client: LlmClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl HintProvider for LlmHintProvider {
    #[instrument(skip_all, fields(guesses = history.len()))]
    async fn hint(&self, secret_word: &str, history: &[String]) -> Result<String, ProviderError> {
        let user_message = match history.split_last() {
            Some((latest, earlier)) => format!(
                "The target word is '{}'.\nPlayer's guess: '{}'.\nPrevious guesses: {:?}.\nProvide a hint following the strict rules above.",
                secret_word, latest, earlier
            ),
            None => format!(
                "The target word is '{}'.\nThe player has not guessed yet.\nProvide an opening hint following the strict rules above.",
                secret_word
            ),
        };

        let text = tokio::time::timeout(
            self.timeout,
            self.client.generate(HINT_SYSTEM_PROMPT, &user_message),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?self.timeout, "hint generation timed out");
            ProviderError::new("hint generation timed out")
        })?
        .map_err(|e| ProviderError::new(format!("hint generation failed: {}", e)))?;

        let text = text.trim();
        if text.is_empty() {
            error!("hint backend returned an empty reply");
            return Err(ProviderError::new("hint backend returned an empty reply"));
        }

        Ok(text.to_string())
    }
}

/// Last whitespace token of the reply, lowercased and stripped of
/// surrounding punctuation. Chat models like to answer "Apple." or
/// "The word is: apple".
fn normalize_word(reply: &str) -> String {
    reply
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_word() {
        assert_eq!(normalize_word("apple"), "apple");
    }

    #[test]
    fn test_normalize_trims_punctuation_and_case() {
        assert_eq!(normalize_word("  Apple.\n"), "apple");
        assert_eq!(normalize_word("\"Banana\""), "banana");
    }

    #[test]
    fn test_normalize_takes_last_token_of_sentence() {
        assert_eq!(normalize_word("The word is: kettle"), "kettle");
    }

    #[test]
    fn test_normalize_empty_reply() {
        assert_eq!(normalize_word("   \n"), "");
    }
}
