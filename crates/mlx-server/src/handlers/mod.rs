//! HTTP request handlers for API endpoints.

pub mod chat;
pub mod health;
pub mod models;
pub mod status;

pub use chat::handle_chat_completion;
pub use health::handle_health;
pub use models::{handle_get_model, handle_list_models, handle_load_model, handle_unload_model};
pub use status::handle_status;

use crate::error::ServerError;

/// Router fallback: unmatched paths get a JSON 404 instead of an empty body.
pub async fn fallback_not_found() -> ServerError {
    ServerError::NotFound("unknown route".to_string())
}
