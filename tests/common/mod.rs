#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use storyrelay::llm::models::{GenerationConfig, RawOutput, Turn};
use storyrelay::llm::{LlmError, LlmProvider};
use storyrelay::session::{SessionService, SessionStore};

pub fn forest_json() -> Value {
    json!({
        "story": "You see a forest.",
        "firstoption": "Enter",
        "secondoption": "Leave",
        "name": "Adventurer",
        "hp": 100,
        "location": "Forest Edge",
        "inventory": []
    })
}

/// Provider double that replays scripted outputs, then the forest turn forever.
#[derive(Default)]
pub struct StubProvider {
    script: Mutex<VecDeque<Result<RawOutput, LlmError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    /// History length observed on each call.
    seen: Mutex<Vec<usize>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn push(self, output: Result<RawOutput, LlmError>) -> Self {
        self.script.lock().unwrap().push_back(output);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_history_lengths(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(
        &self,
        history: &[Turn],
        input: &str,
        _config: &GenerationConfig,
    ) -> Result<RawOutput, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(history.len());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(output) => output,
            None => {
                let mut turn = forest_json();
                turn["story"] = json!(format!("You {}.", input));
                Ok(RawOutput::Structured(turn))
            }
        }
    }
}

pub fn service_with(provider: Arc<StubProvider>) -> SessionService {
    SessionService::new(
        Arc::new(SessionStore::new()),
        provider,
        GenerationConfig::default(),
    )
}
