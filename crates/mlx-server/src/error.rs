//! HTTP error handling and response mapping.
//!
//! Taxonomy: validation failures map to 422, unknown models and routes to
//! 404, capacity and load failures to 400, and engine failures to 500. All
//! error responses carry an OpenAI-style `{"error": {...}}` JSON body; no
//! internal detail beyond a safe message is surfaced.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mlx_engine::EngineError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("capacity exceeded: {0}")]
    Capacity(String),

    #[error("model load failed: {0}")]
    LoadFailed(String),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ServerError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_request_error", msg)
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found_error", msg),
            ServerError::Capacity(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            ServerError::LoadFailed(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            ServerError::Engine(err) => {
                // Log the real cause, return only a safe message.
                tracing::error!(error = %err, "engine failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "generation failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
                "param": null,
                "code": null,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        let cases = [
            (ServerError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServerError::Capacity("x".into()), StatusCode::BAD_REQUEST),
            (ServerError::LoadFailed("x".into()), StatusCode::BAD_REQUEST),
            (
                ServerError::Engine(EngineError::Generation("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn engine_error_message_is_sanitized() {
        let err = ServerError::Engine(EngineError::Generation(
            "stack trace at 0xdeadbeef".into(),
        ));
        // The HTTP message must not echo runtime internals.
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
