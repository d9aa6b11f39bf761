//! Wire types for streamed chat completions.
//!
//! A streaming response is a sequence of chunks: a role announcement,
//! one content delta per engine fragment, and a closing chunk carrying
//! the finish reason. Fields that are absent from a given chunk are
//! omitted from the JSON rather than serialized as null.

use crate::models::common::Role;
use serde::{Deserialize, Serialize};

/// One SSE chunk. `object` is always `"chat.completion.chunk"`; `id` and
/// `created` repeat the values of the first chunk for the whole stream.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoiceDelta>,
}

/// Per-chunk choice. `finish_reason` is only set on the closing chunk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoiceDelta {
    pub index: usize,
    pub delta: ChatDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental payload: the role on the opening chunk, a text fragment on
/// content chunks, neither on the closing chunk.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
