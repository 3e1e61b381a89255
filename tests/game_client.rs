use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use storyrelay::client::{Game, GameBackend, RemoteBackend};
use storyrelay::error::CoreError;
use storyrelay::game::{GenerationResult, RETRY_OPTION};
use storyrelay::llm::models::RawOutput;
use storyrelay::llm::LlmError;
use storyrelay::session::{SessionId, SessionService};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{forest_json, service_with, StubProvider};

/// Backend wrapper that can "forget" sessions to mimic a relay restart.
struct ForgetfulBackend {
    inner: SessionService,
    forget: AtomicUsize,
    sessions_started: AtomicUsize,
}

#[async_trait]
impl GameBackend for ForgetfulBackend {
    async fn start_session(&self) -> Result<SessionId, CoreError> {
        self.sessions_started.fetch_add(1, Ordering::SeqCst);
        self.inner.start_session().await
    }

    async fn generate(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<GenerationResult, CoreError> {
        if self.forget.load(Ordering::SeqCst) > 0 {
            self.forget.fetch_sub(1, Ordering::SeqCst);
            return Err(CoreError::SessionNotFound(session_id.clone()));
        }
        self.inner.generate(session_id, input).await
    }
}

#[tokio::test]
async fn test_begin_plays_opening_prompt() {
    let provider = Arc::new(StubProvider::new().push(Ok(RawOutput::Structured(forest_json()))));
    let mut game = Game::new(service_with(provider.clone()), "set the scene");

    let view = game.begin().await;
    assert_eq!(view.story, "You see a forest.");
    assert_eq!(view.options, vec!["Enter", "Leave"]);
    assert_eq!(view.player.location, "Forest Edge");
    // The opening prompt itself is not part of the transcript.
    assert_eq!(view.transcript, vec!["You see a forest."]);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_failed_submit_then_retry_replays_input() {
    let provider = Arc::new(
        StubProvider::new()
            .push(Ok(RawOutput::Structured(forest_json())))
            .push(Err(LlmError::Network("timed out".to_string()))),
    );
    let service = service_with(provider.clone());
    let mut game = Game::new(service.clone(), "set the scene");
    game.begin().await;

    let view = game.submit("Enter").await;
    assert_eq!(view.options, vec![RETRY_OPTION]);
    assert!(view.story.contains("timed out"));
    assert_eq!(view.player.location, "Forest Edge");
    assert!(!view.session_expired);

    let view = game.retry().await;
    assert_eq!(view.story, "You Enter.");
    assert_eq!(view.transcript, vec!["You see a forest.", "Enter", "You Enter."]);

    let id = game.session_id().unwrap().clone();
    let history = service.store().get_history(&id).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].content, "Enter");
}

#[tokio::test]
async fn test_expired_session_retry_starts_new_game() {
    let backend = ForgetfulBackend {
        inner: service_with(Arc::new(StubProvider::new())),
        forget: AtomicUsize::new(0),
        sessions_started: AtomicUsize::new(0),
    };
    let mut game = Game::new(backend, "set the scene");
    game.begin().await;
    let first_id = game.session_id().unwrap().clone();

    game_backend(&game).forget.store(1, Ordering::SeqCst);
    let view = game.submit("go north").await;
    assert!(view.session_expired);
    assert_eq!(view.options, vec![RETRY_OPTION]);

    let view = game.retry().await;
    assert!(!view.session_expired);
    assert_eq!(view.story, "You set the scene.");
    assert_ne!(game.session_id().unwrap(), &first_id);
    assert_eq!(game_backend(&game).sessions_started.load(Ordering::SeqCst), 2);
}

fn game_backend(game: &Game<ForgetfulBackend>) -> &ForgetfulBackend {
    game.backend()
}

#[tokio::test]
async fn test_remote_backend_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessionId": "s1" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forest_json()))
        .mount(&server)
        .await;

    let backend = RemoteBackend::new(format!("{}/", server.uri()));
    let id = backend.start_session().await.unwrap();
    assert_eq!(id, SessionId::from("s1"));

    let result = backend.generate(&id, "look around").await.unwrap();
    assert_eq!(result.first_option, "Enter");
}

#[tokio::test]
async fn test_remote_backend_maps_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = RemoteBackend::new(server.uri());
    let err = backend
        .generate(&SessionId::from("stale"), "go north")
        .await
        .unwrap_err();
    assert!(err.is_session_not_found());

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"story\": \"half\"}"))
        .mount(&server)
        .await;

    let backend = RemoteBackend::new(server.uri());
    let err = backend
        .generate(&SessionId::from("s1"), "go north")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::MalformedResponse { .. }));
}
