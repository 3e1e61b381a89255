use thiserror::Error;

use crate::llm::LlmError;
use crate::session::SessionId;

/// Every failure the core can hand back to a caller.
///
/// Nothing inside the core swallows or retries these; turning them into
/// something a player can look at is the projector's job.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Model gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("Model gateway error: {0}")]
    GatewayError(String),
    #[error("Malformed model response: {reason}")]
    MalformedResponse { reason: String, payload: String },
    #[error("Session store exhausted")]
    StoreExhausted,
}

impl CoreError {
    pub fn malformed(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        CoreError::MalformedResponse {
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    pub fn is_session_not_found(&self) -> bool {
        matches!(self, CoreError::SessionNotFound(_))
    }
}

impl From<LlmError> for CoreError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Network(msg) => CoreError::GatewayUnavailable(msg),
            other => CoreError::GatewayError(other.to_string()),
        }
    }
}
