use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::llm::{
    models::{GenerationConfig, RawOutput, Turn},
    status_error, LlmError, LlmProvider,
};

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: Client, base_url: String, model: String) -> Self {
        Self {
            client,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        history: &[Turn],
        input: &str,
        config: &GenerationConfig,
    ) -> Result<RawOutput, LlmError> {
        let mut messages: Vec<Value> = history
            .iter()
            .map(|turn| json!({ "role": turn.role.chat_role(), "content": turn.content }))
            .collect();
        messages.push(json!({ "role": "user", "content": input }));

        // Ollama takes the JSON schema itself as `format`.
        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "format": config.response_schema,
            "options": {
                "temperature": config.temperature,
                "top_p": config.top_p,
                "top_k": config.top_k,
                "num_predict": config.max_output_tokens,
            }
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error("Ollama", response).await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = json["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("missing message content".to_string()))?;

        Ok(RawOutput::Text(content.to_string()))
    }
}
