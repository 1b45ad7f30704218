//! Keyed game session management for the HTTP layer.

use crate::config::GameConfig;
use crate::game::GameSession;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Handle to one session's state, serialized by its own lock.
pub type SessionHandle = Arc<tokio::sync::Mutex<GameSession>>;

/// Owns every live session, keyed by session id.
///
/// The map lock is held only for lookup. Each session carries its own async
/// mutex that stays held across provider calls, so concurrent requests for
/// the same key cannot interleave mid-guess.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: GameConfig,
    sessions: Arc<Mutex<HashMap<SessionId, SessionHandle>>>,
}

impl SessionManager {
    /// Creates an empty manager; sessions are created on first use.
    #[instrument(skip(config))]
    pub fn new(config: GameConfig) -> Self {
        info!("Creating session manager");
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the session for `id`, creating it if needed.
    #[instrument(skip(self))]
    pub fn session(&self, id: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(session_id = id, "Creating new session");
                Arc::new(tokio::sync::Mutex::new(GameSession::new(
                    self.config.clone(),
                )))
            })
            .clone()
    }
}
