pub mod models;
pub mod projector;
pub mod validator;

pub use models::{GenerationResult, Item, PlayerState};
pub use projector::{apply_error, apply_result, record_choice, ViewModel, RETRY_OPTION};
