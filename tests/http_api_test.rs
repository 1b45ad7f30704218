//! Integration tests for the HTTP surface.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`; the
//! providers are scripted so no network is involved.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wordhost::config::GameConfig;
use wordhost::providers::{HintProvider, ProviderError, WordProvider};
use wordhost::server::{AppState, router};
use wordhost::session::SessionManager;

struct FixedWord(&'static str);

#[async_trait]
impl WordProvider for FixedWord {
    async fn generate(&self, _excluding: &[String]) -> Result<String, ProviderError> {
        Ok(self.0.to_string())
    }
}

struct FailingWords;

#[async_trait]
impl WordProvider for FailingWords {
    async fn generate(&self, _excluding: &[String]) -> Result<String, ProviderError> {
        Err(ProviderError::new("backend down"))
    }
}

struct CannedHint;

#[async_trait]
impl HintProvider for CannedHint {
    async fn hint(&self, _secret_word: &str, history: &[String]) -> Result<String, ProviderError> {
        Ok(format!("hint after {} guesses", history.len()))
    }
}

fn test_app(words: Arc<dyn WordProvider>) -> Router {
    let state = AppState::new(
        SessionManager::new(GameConfig::default()),
        words,
        Arc::new(CannedHint),
    );
    router(state)
}

async fn post(app: &Router, uri: &str, body: Option<Value>, session: Option<&str>) -> Value {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(session) = session {
        builder = builder.header("x-session-id", session);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn guess(app: &Router, text: &str, session: Option<&str>) -> Value {
    post(app, "/make-guess", Some(json!({ "guess": text })), session).await
}

#[tokio::test]
async fn test_home_serves_game_page() {
    let app = test_app(Arc::new(FixedWord("apple")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let page = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(page.contains("Word Guessing Game"));
    assert!(page.contains("/make-guess"));
}

#[tokio::test]
async fn test_start_game_response() {
    let app = test_app(Arc::new(FixedWord("apple")));

    let body = post(&app, "/start-game", None, None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "I've picked a word! Start guessing!");
}

#[tokio::test]
async fn test_guess_without_game_is_an_error() {
    let app = test_app(Arc::new(FixedWord("apple")));

    let body = guess(&app, "apple", None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please start a new game first!");
    assert_eq!(body["game_over"], false);
    assert_eq!(body["attempts_made"], 0);
}

#[tokio::test]
async fn test_full_game_flow() {
    let app = test_app(Arc::new(FixedWord("apple")));

    post(&app, "/start-game", None, None).await;

    let body = guess(&app, "pear", None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "hint after 1 guesses");
    assert_eq!(body["game_over"], false);
    assert_eq!(body["attempts_made"], 1);

    let body = guess(&app, "apple", None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["game_over"], true);
    assert_eq!(body["attempts_made"], 2);
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("apple")
    );
}

#[tokio::test]
async fn test_get_hint_does_not_consume_attempts() {
    let app = test_app(Arc::new(FixedWord("apple")));

    post(&app, "/start-game", None, None).await;
    guess(&app, "pear", None).await;

    let body = post(&app, "/get-hint", None, None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "hint after 1 guesses");

    // The next guess still counts from where it left off.
    let body = guess(&app, "plum", None).await;
    assert_eq!(body["attempts_made"], 2);
}

#[tokio::test]
async fn test_get_hint_without_game_is_an_error() {
    let app = test_app(Arc::new(FixedWord("apple")));

    let body = post(&app, "/get-hint", None, None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please start a new game first!");
}

#[tokio::test]
async fn test_reveal_word() {
    let app = test_app(Arc::new(FixedWord("apple")));

    let body = post(&app, "/reveal-word", None, None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No word to reveal.");

    post(&app, "/start-game", None, None).await;
    let body = post(&app, "/reveal-word", None, None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "The word was 'apple'.");
}

#[tokio::test]
async fn test_exit_game_reveals_word_and_resets() {
    let app = test_app(Arc::new(FixedWord("apple")));

    post(&app, "/start-game", None, None).await;
    let body = post(&app, "/exit-game", None, None).await;
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["message"],
        "Thanks for playing! The word was 'apple'. Goodbye!"
    );

    let body = guess(&app, "apple", None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please start a new game first!");
}

#[tokio::test]
async fn test_sessions_are_isolated_by_header() {
    let app = test_app(Arc::new(FixedWord("apple")));

    post(&app, "/start-game", None, Some("alice")).await;

    // Bob has no game yet.
    let body = guess(&app, "apple", Some("bob")).await;
    assert_eq!(body["status"], "error");

    // Alice's game is unaffected.
    let body = guess(&app, "apple", Some("alice")).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["game_over"], true);
}

#[tokio::test]
async fn test_start_game_provider_failure_is_generic_error() {
    let app = test_app(Arc::new(FailingWords));

    let body = post(&app, "/start-game", None, None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "The game host is unavailable right now. Please try again!"
    );

    // The session is still idle afterwards.
    let body = guess(&app, "apple", None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please start a new game first!");
}
