use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    /// Role name on chat-completion style APIs, which call the model "assistant".
    pub fn chat_role(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// What a provider handed back. Most providers return text that should hold
/// a JSON object; some deliver the object already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Text(String),
    Structured(Value),
}

impl RawOutput {
    /// The payload as text, for diagnostics.
    pub fn to_text(&self) -> String {
        match self {
            RawOutput::Text(text) | RawOutput::Structured(Value::String(text)) => text.clone(),
            RawOutput::Structured(value) => value.to_string(),
        }
    }
}

/// Sampling parameters sent with every turn. Fixed for the lifetime of the
/// process once loaded from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_response_mime_type")]
    pub response_mime_type: String,
    #[serde(default = "story_turn_schema")]
    pub response_schema: Value,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            response_mime_type: default_response_mime_type(),
            response_schema: story_turn_schema(),
        }
    }
}

fn default_temperature() -> f32 {
    1.0
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_response_mime_type() -> String {
    "application/json".to_string()
}

/// JSON schema of a single story turn as the model is asked to emit it.
pub fn story_turn_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "story": {"type": "string"},
            "firstoption": {"type": "string"},
            "secondoption": {"type": "string"},
            "name": {"type": "string"},
            "hp": {"type": "integer"},
            "location": {"type": "string"},
            "inventory": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "quantity": {"type": "integer"}
                    },
                    "required": ["name", "quantity"]
                }
            }
        },
        "required": ["story", "firstoption", "secondoption", "name", "hp", "location", "inventory"]
    })
}
