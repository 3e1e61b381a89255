//! Client side of the game: drives a backend and folds its answers into a
//! [`ViewModel`] the terminal (or any other front end) can render.

pub mod remote;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::game::{apply_error, apply_result, record_choice, GenerationResult, ViewModel};
use crate::session::{SessionId, SessionService};

pub use remote::RemoteBackend;

/// The two calls a front end makes into the core.
#[async_trait]
pub trait GameBackend: Send + Sync {
    async fn start_session(&self) -> Result<SessionId, CoreError>;

    async fn generate(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<GenerationResult, CoreError>;
}

#[async_trait]
impl GameBackend for SessionService {
    async fn start_session(&self) -> Result<SessionId, CoreError> {
        SessionService::start_session(self).await
    }

    async fn generate(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<GenerationResult, CoreError> {
        SessionService::generate(self, session_id, input).await
    }
}

pub struct Game<B> {
    backend: B,
    opening_prompt: String,
    session: Option<SessionId>,
    /// Input of the last failed call, replayed on retry.
    pending: Option<String>,
    view: ViewModel,
}

impl<B: GameBackend> Game<B> {
    pub fn new(backend: B, opening_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            opening_prompt: opening_prompt.into(),
            session: None,
            pending: None,
            view: ViewModel::default(),
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Opens a fresh session and plays the opening prompt. The opening prompt
    /// is not shown in the transcript.
    pub async fn begin(&mut self) -> &ViewModel {
        self.view = ViewModel::default();
        self.session = None;
        self.pending = None;

        match self.backend.start_session().await {
            Ok(id) => self.session = Some(id),
            Err(e) => {
                self.fail(&e);
                return &self.view;
            }
        }

        let prompt = self.opening_prompt.clone();
        self.play(prompt).await;
        &self.view
    }

    pub async fn submit(&mut self, input: &str) -> &ViewModel {
        if self.session.is_none() {
            return self.begin().await;
        }
        let view = std::mem::take(&mut self.view);
        self.view = record_choice(view, input);
        self.play(input.to_string()).await;
        &self.view
    }

    /// Replays the failed call, or starts over when the session is gone.
    pub async fn retry(&mut self) -> &ViewModel {
        if self.view.session_expired || self.session.is_none() {
            return self.begin().await;
        }
        match self.pending.take() {
            Some(input) => {
                self.play(input).await;
                &self.view
            }
            None => &self.view,
        }
    }

    async fn play(&mut self, input: String) {
        let Some(id) = self.session.clone() else {
            return;
        };

        match self.backend.generate(&id, &input).await {
            Ok(result) => {
                self.pending = None;
                let view = std::mem::take(&mut self.view);
                self.view = apply_result(view, &result);
            }
            Err(e) => {
                self.pending = Some(input);
                self.fail(&e);
            }
        }
    }

    fn fail(&mut self, error: &CoreError) {
        let view = std::mem::take(&mut self.view);
        self.view = apply_error(view, error);
    }
}
