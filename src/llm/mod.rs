pub mod gemini;
pub mod models;
pub mod ollama;
pub mod openai;

use gemini::GeminiProvider;
use ollama::OllamaProvider;
use openai::OpenAiProvider;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use models::{GenerationConfig, RawOutput, Turn};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Rate Limited")]
    RateLimited,
}

/// A single request/response exchange with a hosted model.
///
/// `history` is the session's prior turns, `input` the new player turn. The
/// returned output is only *asked* to follow `config.response_schema`; callers
/// validate it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(
        &self,
        history: &[Turn],
        input: &str,
        config: &GenerationConfig,
    ) -> Result<RawOutput, LlmError>;
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_default(config: &AppConfig) -> Option<Arc<dyn LlmProvider>> {
        let client = http_client(config.llm.request_timeout_secs)?;

        match config.llm.provider.as_str() {
            "gemini" => {
                let cfg = config.llm.gemini.as_ref()?;
                Some(Arc::new(GeminiProvider::new(
                    client,
                    cfg.api_key.clone(),
                    cfg.api_base.clone(),
                    cfg.model.clone(),
                )))
            }
            "openai" => {
                let cfg = config.llm.openai.as_ref()?;
                Some(Arc::new(OpenAiProvider::new(
                    client,
                    cfg.api_key.clone(),
                    cfg.api_base.clone(),
                    cfg.model.clone(),
                )))
            }
            "ollama" => {
                let cfg = config.llm.ollama.as_ref()?;
                Some(Arc::new(OllamaProvider::new(
                    client,
                    cfg.base_url.clone(),
                    cfg.model.clone(),
                )))
            }
            _ => None,
        }
    }
}

fn http_client(timeout_secs: Option<u64>) -> Option<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().ok()
}

/// Reads an error body and classifies a non-success provider status.
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return LlmError::RateLimited;
    }
    LlmError::Api(format!("{} Error {}: {}", provider, status, text))
}
