//! Server-Sent Events (SSE) streaming for chat completions.
//!
//! Implements the OpenAI-compatible streaming protocol:
//! - Each chunk is sent as `data: {json}\n\n`
//! - Final message is `data: [DONE]\n\n`
//! - Fragment production stops promptly when the client disconnects: the
//!   stream owns a cancellation drop-guard and the model's generation slot,
//!   both released when axum drops the stream.

use std::sync::Arc;

use axum::response::sse::{Event, Sse};
use chrono::Utc;
use futures::stream::Stream;
use mlx_engine::FragmentStream;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::model_manager::ModelInfo;
use crate::models::common::Role;
use crate::models::streaming::{ChatChoiceDelta, ChatCompletionChunk, ChatDelta};
use crate::state::AppState;

/// Create an SSE stream that relays engine fragments as completion chunks.
pub fn stream_chat_completion(
    state: AppState,
    info: Arc<ModelInfo>,
    mut fragments: FragmentStream,
    max_tokens: usize,
    cancel: CancellationToken,
    guard: OwnedMutexGuard<()>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let request_id = format!("chatcmpl-{}", Uuid::new_v4());
    let created = Utc::now().timestamp() as u64;
    let model = info.model_id.clone();

    let stream = async_stream::stream! {
        // Both live for the lifetime of the stream. Dropping the stream
        // cancels the token (stopping the producer) and frees the model's
        // generation slot.
        let _guard = guard;
        let _stop_producer = cancel.drop_guard();

        // Initial chunk: role announcement
        let role_chunk = chunk(&request_id, created, &model, ChatDelta {
            role: Some(Role::Assistant),
            content: None,
        }, None);
        yield Ok(Event::default().data(serde_json::to_string(&role_chunk).unwrap()));

        // Relay loop: one SSE event per produced fragment. Fragments may
        // carry more than one token, so the budget is tracked with the
        // model's tokenizer rather than by counting fragments.
        let mut completion_tokens = 0usize;
        while let Some(fragment) = fragments.next().await {
            let text = match fragment {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(error = %e, "generation failed mid-stream");
                    break;
                }
            };
            completion_tokens += state.engine.count_tokens(&info.tokenizer, &text);

            let content_chunk = chunk(&request_id, created, &model, ChatDelta {
                role: None,
                content: Some(text),
            }, None);
            yield Ok(Event::default().data(serde_json::to_string(&content_chunk).unwrap()));
        }

        let finish_reason = if completion_tokens >= max_tokens { "length" } else { "stop" };

        // Final chunk: finish reason, then the [DONE] sentinel.
        let final_chunk = chunk(&request_id, created, &model, ChatDelta {
            role: None,
            content: None,
        }, Some(finish_reason.to_string()));
        yield Ok(Event::default().data(serde_json::to_string(&final_chunk).unwrap()));
        yield Ok(Event::default().data("[DONE]"));
    };

    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default())
}

fn chunk(
    id: &str,
    created: u64,
    model: &str,
    delta: ChatDelta,
    finish_reason: Option<String>,
) -> ChatCompletionChunk {
    ChatCompletionChunk {
        id: id.to_string(),
        object: "chat.completion.chunk".to_string(),
        created,
        model: model.to_string(),
        choices: vec![ChatChoiceDelta {
            index: 0,
            delta,
            finish_reason,
        }],
    }
}
