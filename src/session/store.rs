use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::error::CoreError;
use crate::llm::models::Turn;
use crate::session::SessionId;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The only mutation a session ever sees: one user turn, then one model turn.
    pub fn append_turns(&mut self, user: Turn, model: Turn) {
        self.turns.reserve(2);
        self.turns.push(user);
        self.turns.push(model);
    }
}

/// Lock guarding one session. Whoever holds it owns that session's timeline.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory session registry.
///
/// Built once at process start and shared behind an `Arc`; everything it holds
/// is gone when it is dropped. The outer map lock is only taken for lookups
/// and inserts, so sessions never wait on each other.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_session(&self) -> Result<SessionId, CoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .try_reserve(1)
            .map_err(|_| CoreError::StoreExhausted)?;

        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }

        sessions.insert(id.clone(), Arc::new(Mutex::new(Session::new(id.clone()))));
        info!("Created session {} ({} live)", id, sessions.len());
        Ok(id)
    }

    pub async fn handle(&self, id: &SessionId) -> Result<SessionHandle, CoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::SessionNotFound(id.clone()))
    }

    /// Snapshot of a session. Takes the session lock, so it waits for any
    /// in-flight turn on that session to finish.
    pub async fn get_session(&self, id: &SessionId) -> Result<Session, CoreError> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Copy of the turn list. Like [`get_session`](Self::get_session) this
    /// waits behind an in-flight turn and then reports it.
    pub async fn get_history(&self, id: &SessionId) -> Result<Vec<Turn>, CoreError> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.turns().to_vec())
    }

    pub async fn append_turns(
        &self,
        id: &SessionId,
        user: Turn,
        model: Turn,
    ) -> Result<(), CoreError> {
        let handle = self.handle(id).await?;
        handle.lock().await.append_turns(user, model);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
