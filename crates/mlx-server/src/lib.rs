//! # mlx-server
//!
//! OpenAI-compatible HTTP API for the MLX inference engine.
//!
//! Exposes the `MlxEngine` trait through REST endpoints compatible with the
//! OpenAI API, plus MLX-specific model lifecycle endpoints (`/v1/mlx/...`).
//! Includes support for streaming completions via Server-Sent Events (SSE).

pub mod error;
pub mod extract;
pub mod handlers;
pub mod model_manager;
pub mod models;
pub mod server;
pub mod state;
pub mod streaming;

pub use error::ServerError;
pub use model_manager::{ModelInfo, ModelManager};
pub use server::{create_router, run_server};
pub use state::{AppState, ServerConfig};
