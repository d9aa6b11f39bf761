//! Chat completion handler.
//!
//! Request lifecycle: validate payload, resolve the model in the registry,
//! acquire the model's generation slot, then either collect a full
//! completion or hand an SSE stream back to the client. Unknown model ids
//! are a 404; engine failures are a 500 with a sanitized message.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use mlx_engine::GenerationParams;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::ServerError,
    extract,
    models::common::{ChatMessage, Role},
    models::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, Usage},
    state::AppState,
    streaming,
};

/// Handle chat completion requests (streaming and non-streaming).
pub async fn handle_chat_completion(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<ChatCompletionRequest>,
) -> Result<axum::response::Response, ServerError> {
    if req.messages.is_empty() {
        return Err(ServerError::Validation(
            "messages must not be empty".to_string(),
        ));
    }

    let info = state.models.get_model(&req.model).await.ok_or_else(|| {
        ServerError::NotFound(format!("model '{}' is not loaded", req.model))
    })?;

    let prompt = format_messages(&req.messages);
    let params = GenerationParams {
        max_tokens: req.max_tokens.unwrap_or(state.config.default_max_tokens),
        temperature: req.temperature.unwrap_or(state.config.default_temperature),
        top_p: req.top_p,
    };

    // One generation at a time per model; requests queue here.
    let guard = info.acquire_generation().await;

    if req.stream {
        let cancel = CancellationToken::new();
        let fragments = state.engine.generate_stream(
            &info.model,
            &info.tokenizer,
            &prompt,
            &params,
            cancel.clone(),
        )?;
        // Guard and cancel token move into the stream. Client disconnect
        // drops the stream, which cancels the token and frees the slot.
        return Ok(streaming::stream_chat_completion(
            state.clone(),
            info,
            fragments,
            params.max_tokens,
            cancel,
            guard,
        )
        .into_response());
    }

    let generated = state
        .engine
        .generate(&info.model, &info.tokenizer, &prompt, &params)?;

    let prompt_tokens = state.engine.count_tokens(&info.tokenizer, &prompt);
    let completion_tokens = state.engine.count_tokens(&info.tokenizer, &generated);
    let finish_reason = if completion_tokens >= params.max_tokens {
        "length"
    } else {
        "stop"
    };
    drop(guard);

    Ok(Json(ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4()),
        object: "chat.completion".to_string(),
        created: Utc::now().timestamp() as u64,
        model: req.model,
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: Role::Assistant,
                content: generated,
            },
            finish_reason: finish_reason.to_string(),
        }],
        usage: Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        },
    })
    .into_response())
}

/// Flatten chat messages into a single prompt string.
fn format_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_messages_preserves_order_and_roles() {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: "be brief".to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: "hello".to_string(),
            },
        ];
        assert_eq!(format_messages(&messages), "system: be brief\nuser: hello");
    }
}
