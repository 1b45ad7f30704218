//! Word-guessing game session state machine.
//!
//! A session moves through `Idle → Active → {Won | Lost | GaveUp} → Idle`.
//! `Active` self-loops on wrong guesses and hint requests. The machine only
//! talks to the outside world through the [`WordProvider`] and
//! [`HintProvider`] seams.

use crate::config::GameConfig;
use crate::providers::{HintProvider, ProviderError, WordProvider};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Phrases that immediately concede the game.
const GIVE_UP_PHRASES: [&str; 3] = ["i give up", "give up", "giveup"];

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// No game in progress.
    Idle,
    /// A word is picked and guesses are accepted.
    Active,
    /// The player guessed the word.
    Won,
    /// The player ran out of attempts.
    Lost,
    /// The player conceded.
    GaveUp,
}

/// Errors surfaced by session operations.
#[derive(Debug, Clone, Display, Error)]
pub enum GameError {
    /// A guess or hint was requested with no active game.
    #[display("No active game")]
    NoActiveGame,
    /// The word or hint backend failed or produced a malformed reply.
    #[display("{_0}")]
    Provider(#[error(source)] ProviderError),
}

impl From<ProviderError> for GameError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

/// Outcome of a session operation, ready for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReply {
    message: String,
    game_over: bool,
}

impl GameReply {
    fn ongoing(message: String) -> Self {
        Self {
            message,
            game_over: false,
        }
    }

    fn terminal(message: String) -> Self {
        Self {
            message,
            game_over: true,
        }
    }

    /// Host message for the player.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this reply ended the game.
    pub fn game_over(&self) -> bool {
        self.game_over
    }
}

/// One player's word-guessing session.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    secret_word: Option<String>,
    guess_history: Vec<String>,
    attempts_made: u32,
    status: GameStatus,
    recent_words: VecDeque<String>,
}

impl GameSession {
    /// Creates an idle session.
    #[instrument(skip(config))]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            secret_word: None,
            guess_history: Vec::new(),
            attempts_made: 0,
            status: GameStatus::Idle,
            recent_words: VecDeque::new(),
        }
    }

    /// Returns the session status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the number of attempts consumed in the current game.
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// Returns the normalized guesses made so far, oldest first.
    pub fn guess_history(&self) -> &[String] {
        &self.guess_history
    }

    /// Returns the secret words remembered across games, oldest first.
    pub fn recent_words(&self) -> &VecDeque<String> {
        &self.recent_words
    }

    /// Returns the current word without changing state.
    pub fn reveal_word(&self) -> Option<&str> {
        self.secret_word.as_deref()
    }

    /// Starts a new game, fetching a fresh word from the provider.
    ///
    /// The provider is re-asked up to `word_retry_attempts` times while it
    /// returns a remembered word; after that the memory is cleared and the
    /// last word is accepted anyway. A provider failure leaves the session
    /// in its prior state.
    #[instrument(skip(self, words), fields(status = ?self.status))]
    pub async fn start_game(&mut self, words: &dyn WordProvider) -> Result<GameReply, GameError> {
        let excluding: Vec<String> = self.recent_words.iter().cloned().collect();

        let mut candidate: Option<String> = None;
        let mut unique = false;
        for attempt in 1..=*self.config.word_retry_attempts() {
            let word = words.generate(&excluding).await?;
            if !self.recent_words.contains(&word) {
                candidate = Some(word);
                unique = true;
                break;
            }
            debug!(attempt, "provider repeated a recent word");
            candidate = Some(word);
        }

        let Some(word) = candidate else {
            return Err(ProviderError::new("word provider produced no candidate").into());
        };
        if !unique {
            warn!(
                remembered = self.recent_words.len(),
                "no unused word after retries, clearing recent-word memory"
            );
            self.recent_words.clear();
        }

        self.remember(word.clone());
        self.secret_word = Some(word);
        self.guess_history.clear();
        self.attempts_made = 0;
        self.status = GameStatus::Active;

        info!("Game started");
        Ok(GameReply::ongoing(
            "I've picked a word! Start guessing!".to_string(),
        ))
    }

    /// Processes one guess.
    ///
    /// The input is trimmed and lowercased. Terminal conditions are checked
    /// in a fixed order: give-up, then attempt exhaustion, then a correct
    /// guess; only a guess that survives all three reaches the hint
    /// provider. A hint failure rolls the guess back so the session is left
    /// as it was before the request.
    #[instrument(skip(self, hints), fields(attempts = self.attempts_made))]
    pub async fn submit_guess(
        &mut self,
        raw: &str,
        hints: &dyn HintProvider,
    ) -> Result<GameReply, GameError> {
        let word = match (self.status, self.secret_word.as_deref()) {
            (GameStatus::Active, Some(word)) => word.to_string(),
            _ => return Err(GameError::NoActiveGame),
        };

        let guess = raw.trim().to_lowercase();
        self.attempts_made += 1;

        if GIVE_UP_PHRASES.contains(&guess.as_str()) {
            self.status = GameStatus::GaveUp;
            info!(attempts = self.attempts_made, "Player gave up");
            return Ok(GameReply::terminal(format!(
                "The word was '{}'. Don't worry, try another round!",
                word
            )));
        }

        if self.attempts_made >= *self.config.max_attempts() {
            self.status = GameStatus::Lost;
            info!(attempts = self.attempts_made, "Attempts exhausted");
            return Ok(GameReply::terminal(format!(
                "Game Over! You've reached {} attempts. The word was '{}'.",
                self.config.max_attempts(),
                word
            )));
        }

        if guess == word {
            self.status = GameStatus::Won;
            info!(attempts = self.attempts_made, "Correct guess");
            return Ok(GameReply::terminal(format!(
                "Congratulations! You've won! The word was '{}'!",
                word
            )));
        }

        self.guess_history.push(guess);
        match hints.hint(&word, &self.guess_history).await {
            Ok(text) => Ok(GameReply::ongoing(text)),
            Err(e) => {
                // A failed hint must not consume the attempt.
                self.guess_history.pop();
                self.attempts_made -= 1;
                Err(e.into())
            }
        }
    }

    /// Returns a hint for the current word.
    ///
    /// Leaves the guess history untouched; consumes an attempt only when
    /// `hint_counts_as_attempt` is configured.
    #[instrument(skip(self, hints), fields(attempts = self.attempts_made))]
    pub async fn request_hint(&mut self, hints: &dyn HintProvider) -> Result<GameReply, GameError> {
        let word = match (self.status, self.secret_word.as_deref()) {
            (GameStatus::Active, Some(word)) => word.to_string(),
            _ => return Err(GameError::NoActiveGame),
        };

        let text = hints.hint(&word, &self.guess_history).await?;
        if *self.config.hint_counts_as_attempt() {
            self.attempts_made += 1;
        }
        Ok(GameReply::ongoing(text))
    }

    /// Ends the current game, revealing the word, and resets to idle.
    #[instrument(skip(self), fields(status = ?self.status))]
    pub fn end_game(&mut self) -> GameReply {
        let farewell = match self.secret_word.take() {
            Some(word) => format!("Thanks for playing! The word was '{}'. Goodbye!", word),
            None => "Thanks for playing! Goodbye!".to_string(),
        };

        self.guess_history.clear();
        self.attempts_made = 0;
        self.status = GameStatus::Idle;

        info!("Session reset");
        GameReply::terminal(farewell)
    }

    fn remember(&mut self, word: String) {
        self.recent_words.push_back(word);
        while self.recent_words.len() > *self.config.recent_words_cap() {
            self.recent_words.pop_front();
        }
    }
}
