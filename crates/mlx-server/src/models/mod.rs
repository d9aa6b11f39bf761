//! OpenAI-compatible request/response types.

pub mod chat;
pub mod common;
pub mod management;
pub mod streaming;

pub use chat::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse};
pub use common::{ChatMessage, Role, Usage};
pub use management::{LoadModelRequest, LoadModelResponse, ModelCard, ModelList, UnloadModelRequest};
pub use streaming::ChatCompletionChunk;
