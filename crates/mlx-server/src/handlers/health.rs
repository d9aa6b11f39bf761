//! Health check handler.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// Handle health check requests.
///
/// `timestamp` is fractional epoch seconds with microsecond resolution, so
/// successive calls observe an increasing value.
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp_micros() as f64 / 1_000_000.0,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
