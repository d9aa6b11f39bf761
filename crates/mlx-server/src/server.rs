//! Server setup and routing.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

use crate::{handlers, state::AppState};

/// Create the API router with all routes.
///
/// Unmatched paths fall back to a JSON 404; a known path with the wrong
/// method yields 405 from the router itself.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::handle_health))
        .route("/v1/models", get(handlers::models::handle_list_models))
        .route("/v1/models/:id", get(handlers::models::handle_get_model))
        .route(
            "/v1/mlx/models/load",
            post(handlers::models::handle_load_model),
        )
        .route(
            "/v1/mlx/models/unload",
            post(handlers::models::handle_unload_model),
        )
        .route(
            "/v1/chat/completions",
            post(handlers::chat::handle_chat_completion),
        )
        .route("/v1/mlx/status", get(handlers::status::handle_status))
        .fallback(handlers::fallback_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server.
pub async fn run_server(
    state: AppState,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
