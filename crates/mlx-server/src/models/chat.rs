//! Chat completion request/response types (`POST /v1/chat/completions`).
//!
//! Wire shapes follow the OpenAI chat API so existing clients can point at
//! the local server unchanged; every field name below is part of that
//! contract.

use crate::models::common::{ChatMessage, Usage};
use serde::{Deserialize, Serialize};

/// Chat completion request.
///
/// `messages` is required (a missing field rejects the body with 422);
/// the optional decoding knobs fall back to the `ServerConfig` defaults.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    /// Id of a model previously registered via `/v1/mlx/models/load`.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// One completion choice. The server produces exactly one.
#[derive(Debug, Serialize)]
pub struct ChatChoice {
    pub index: usize,
    pub message: ChatMessage,
    /// "stop" when decoding ended on its own, "length" when the
    /// `max_tokens` budget cut it off.
    pub finish_reason: String,
}

/// Non-streaming chat completion response. `object` is always
/// `"chat.completion"`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    /// Request id, `chatcmpl-{uuid}`.
    pub id: String,
    pub object: String,
    /// Unix timestamp (seconds).
    pub created: u64,
    /// Echo of the requested model id.
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}
