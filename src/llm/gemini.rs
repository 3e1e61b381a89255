use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::llm::{
    models::{GenerationConfig, RawOutput, Turn},
    status_error, LlmError, LlmProvider,
};

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    fn request_body(history: &[Turn], input: &str, config: &GenerationConfig) -> Value {
        // Gemini already speaks "user"/"model", so turns map over one to one.
        let mut contents: Vec<Value> = history
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.as_str(),
                    "parts": [{ "text": turn.content }],
                })
            })
            .collect();
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": input }],
        }));

        json!({
            "contents": contents,
            "generationConfig": {
                "temperature": config.temperature,
                "topP": config.top_p,
                "topK": config.top_k,
                "maxOutputTokens": config.max_output_tokens,
                "responseMimeType": config.response_mime_type,
                "responseSchema": config.response_schema,
            }
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        history: &[Turn],
        input: &str,
        config: &GenerationConfig,
    ) -> Result<RawOutput, LlmError> {
        let body = Self::request_body(history, input, config);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error("Gemini", response).await);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        // A blocked prompt comes back as 200 with no candidates.
        let text = candidate_text(&json).ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidate text");
            LlmError::InvalidResponse(reason.to_string())
        })?;

        Ok(RawOutput::Text(text))
    }
}

/// One answer may be split over several parts; they are joined in order.
fn candidate_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        return None;
    }
    Some(texts.concat())
}
