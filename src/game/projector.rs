use serde::Serialize;

use crate::error::CoreError;
use crate::game::models::{GenerationResult, PlayerState};

pub const RETRY_OPTION: &str = "Retry";

/// Everything the UI needs to draw one screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub player: PlayerState,
    pub story: String,
    pub options: Vec<String>,
    /// Display transcript of chosen options and story snippets.
    pub transcript: Vec<String>,
    /// Set when the last call failed because the session no longer exists,
    /// so the UI can offer a new game instead of retrying a dead session.
    pub session_expired: bool,
    pub last_error: Option<String>,
}

impl ViewModel {
    pub fn is_error(&self) -> bool {
        self.last_error.is_some()
    }
}

pub fn record_choice(mut view: ViewModel, input: &str) -> ViewModel {
    view.transcript.push(input.to_string());
    view
}

pub fn apply_result(mut view: ViewModel, result: &GenerationResult) -> ViewModel {
    view.player = PlayerState::from(result);
    view.story = result.story.clone();
    view.options = result.options();
    view.transcript.push(result.story.clone());
    view.session_expired = false;
    view.last_error = None;
    view
}

pub fn apply_error(mut view: ViewModel, error: &CoreError) -> ViewModel {
    view.story = error.to_string();
    view.options = vec![RETRY_OPTION.to_string()];
    view.session_expired = error.is_session_not_found();
    view.last_error = Some(error.to_string());
    view
}
