//! HTTP surface: routes, request/response types, and session keying.
//!
//! Every route answers 200 with a body-level `status` field ("success" or
//! "error"); user mistakes and backend outages are messages, not HTTP
//! failures, so the browser page can render them in the chat log.

use crate::game::GameError;
use crate::providers::{HintProvider, WordProvider};
use crate::session::SessionManager;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Session key used when the caller does not send one.
const DEFAULT_SESSION: &str = "default";

/// Header carrying the caller's session key.
const SESSION_HEADER: &str = "x-session-id";

const START_FIRST: &str = "Please start a new game first!";
const PROVIDER_DOWN: &str = "The game host is unavailable right now. Please try again!";

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionManager,
    words: Arc<dyn WordProvider>,
    hints: Arc<dyn HintProvider>,
}

impl AppState {
    /// Bundles the session map with the provider implementations.
    pub fn new(
        sessions: SessionManager,
        words: Arc<dyn WordProvider>,
        hints: Arc<dyn HintProvider>,
    ) -> Self {
        Self {
            sessions,
            words,
            hints,
        }
    }
}

/// Request body for `/make-guess`.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessRequest {
    /// The player's raw guess text.
    pub guess: String,
}

/// Response for routes that return only a message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Host message for the player.
    pub message: String,
    /// "success" or "error".
    pub status: &'static str,
}

/// Response for `/make-guess`.
#[derive(Debug, Clone, Serialize)]
pub struct GuessResponse {
    /// Host message for the player.
    pub message: String,
    /// "success" or "error".
    pub status: &'static str,
    /// Whether this guess ended the game.
    pub game_over: bool,
    /// Attempts consumed so far.
    pub attempts_made: u32,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/start-game", post(start_game))
        .route("/make-guess", post(make_guess))
        .route("/get-hint", post(get_hint))
        .route("/reveal-word", post(reveal_word))
        .route("/exit-game", post(exit_game))
        .with_state(state)
}

/// Binds a listener and serves the app until shutdown.
#[instrument(skip(state))]
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceBuilder;

    let app = router(state).layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
        info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
        req
    }));

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}

fn session_key(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

async fn home() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

#[instrument(skip_all)]
async fn start_game(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<MessageResponse> {
    let key = session_key(&headers);
    let handle = state.sessions.session(&key);
    let mut session = handle.lock().await;

    match session.start_game(state.words.as_ref()).await {
        Ok(reply) => {
            info!(session_id = %key, "Game started");
            Json(MessageResponse {
                message: reply.message().to_string(),
                status: "success",
            })
        }
        Err(e) => {
            warn!(session_id = %key, error = %e, "Failed to start game");
            Json(MessageResponse {
                message: PROVIDER_DOWN.to_string(),
                status: "error",
            })
        }
    }
}

#[instrument(skip_all)]
async fn make_guess(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GuessRequest>,
) -> Json<GuessResponse> {
    let key = session_key(&headers);
    let handle = state.sessions.session(&key);
    let mut session = handle.lock().await;

    match session.submit_guess(&req.guess, state.hints.as_ref()).await {
        Ok(reply) => {
            info!(
                session_id = %key,
                attempts = session.attempts_made(),
                game_over = reply.game_over(),
                "Guess processed"
            );
            Json(GuessResponse {
                message: reply.message().to_string(),
                status: "success",
                game_over: reply.game_over(),
                attempts_made: session.attempts_made(),
            })
        }
        Err(GameError::NoActiveGame) => Json(GuessResponse {
            message: START_FIRST.to_string(),
            status: "error",
            game_over: false,
            attempts_made: session.attempts_made(),
        }),
        Err(e) => {
            warn!(session_id = %key, error = %e, "Guess failed");
            Json(GuessResponse {
                message: PROVIDER_DOWN.to_string(),
                status: "error",
                game_over: false,
                attempts_made: session.attempts_made(),
            })
        }
    }
}

#[instrument(skip_all)]
async fn get_hint(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    let key = session_key(&headers);
    let handle = state.sessions.session(&key);
    let mut session = handle.lock().await;

    match session.request_hint(state.hints.as_ref()).await {
        Ok(reply) => Json(MessageResponse {
            message: reply.message().to_string(),
            status: "success",
        }),
        Err(GameError::NoActiveGame) => Json(MessageResponse {
            message: START_FIRST.to_string(),
            status: "error",
        }),
        Err(e) => {
            warn!(session_id = %key, error = %e, "Hint failed");
            Json(MessageResponse {
                message: PROVIDER_DOWN.to_string(),
                status: "error",
            })
        }
    }
}

#[instrument(skip_all)]
async fn reveal_word(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    let key = session_key(&headers);
    let handle = state.sessions.session(&key);
    let session = handle.lock().await;

    match session.reveal_word() {
        Some(word) => Json(MessageResponse {
            message: format!("The word was '{}'.", word),
            status: "success",
        }),
        None => Json(MessageResponse {
            message: "No word to reveal.".to_string(),
            status: "error",
        }),
    }
}

#[instrument(skip_all)]
async fn exit_game(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    let key = session_key(&headers);
    let handle = state.sessions.session(&key);
    let mut session = handle.lock().await;

    let reply = session.end_game();
    info!(session_id = %key, "Game exited");
    Json(MessageResponse {
        message: reply.message().to_string(),
        status: "success",
    })
}
