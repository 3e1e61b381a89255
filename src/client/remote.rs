use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::api::models::{GenerateRequest, StartSessionResponse};
use crate::client::GameBackend;
use crate::error::CoreError;
use crate::game::{validator, GenerationResult};
use crate::llm::models::RawOutput;
use crate::session::SessionId;

/// Talks to a running relay over HTTP.
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GameBackend for RemoteBackend {
    async fn start_session(&self) -> Result<SessionId, CoreError> {
        let response = self
            .client
            .post(format!("{}/start-session", self.base_url))
            .send()
            .await
            .map_err(|e| CoreError::GatewayUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::GatewayError(format!(
                "start-session failed {}: {}",
                status, text
            )));
        }

        let body: StartSessionResponse = response
            .json()
            .await
            .map_err(|e| CoreError::GatewayError(e.to_string()))?;
        Ok(body.session_id)
    }

    async fn generate(
        &self,
        session_id: &SessionId,
        input: &str,
    ) -> Result<GenerationResult, CoreError> {
        let request = GenerateRequest {
            session_id: session_id.clone(),
            input: input.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::GatewayUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::GatewayUnavailable(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::SessionNotFound(session_id.clone()));
        }
        if !status.is_success() {
            return Err(CoreError::GatewayError(format!(
                "generate failed {}: {}",
                status, text
            )));
        }

        validator::parse(RawOutput::Text(text))
    }
}
