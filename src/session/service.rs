use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::game::{validator, GenerationResult};
use crate::llm::models::{GenerationConfig, Turn};
use crate::llm::LlmProvider;
use crate::session::{SessionId, SessionStore};

/// Runs story turns against a session: history in, validated turn out.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<SessionStore>,
    llm: Arc<dyn LlmProvider>,
    generation: Arc<GenerationConfig>,
}

impl SessionService {
    pub fn new(
        store: Arc<SessionStore>,
        llm: Arc<dyn LlmProvider>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            store,
            llm,
            generation: Arc::new(generation),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub async fn start_session(&self) -> Result<SessionId, CoreError> {
        self.store.create_session().await
    }

    /// Plays one turn.
    ///
    /// The session lock is held from the history read until the append, so two
    /// calls on one session run back to back. History only grows once the
    /// model output has validated; on any error it is left as it was.
    pub async fn generate(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<GenerationResult, CoreError> {
        let handle = self.store.handle(session_id).await?;
        let mut session = handle.lock().await;

        let raw = self
            .llm
            .complete(session.turns(), input, &self.generation)
            .await
            .map_err(|e| {
                error!("{} gateway failed for session {}: {}", self.llm.name(), session_id, e);
                CoreError::from(e)
            })?;

        let result = validator::parse(raw).inspect_err(|e| {
            warn!("Rejected model output for session {}: {}", session_id, e);
        })?;

        let model_turn = validator::to_raw(&result)?;
        session.append_turns(Turn::user(input), Turn::model(model_turn));
        info!(
            "Session {} advanced to {} turns",
            session_id,
            session.turns().len()
        );

        Ok(result)
    }
}
