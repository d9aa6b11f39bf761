//! Server status handler (`/v1/mlx/status`).

use axum::{extract::State, Json};
use serde_json::{json, Value};
use sysinfo::System;

use crate::state::AppState;

/// Handle server status requests.
///
/// Reports process-level health: loaded model count, host memory/CPU
/// utilization (0.0..=1.0), and uptime in seconds. GPU utilization is not
/// exposed by the unified-memory runtime, so it reads 0.0.
pub async fn handle_status(State(state): State<AppState>) -> Json<Value> {
    let (memory_usage, cpu_usage) = collect_usage().await;

    Json(json!({
        "status": "running",
        "models_loaded": state.models.loaded_count().await,
        "memory_usage": memory_usage,
        "cpu_usage": cpu_usage,
        "gpu_usage": 0.0,
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// Sample host memory and CPU utilization.
async fn collect_usage() -> (f64, f64) {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu_all();

    // CPU usage needs two samples a short interval apart.
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    sys.refresh_cpu_all();

    let total = sys.total_memory();
    let memory_usage = if total > 0 {
        sys.used_memory() as f64 / total as f64
    } else {
        0.0
    };
    let cpu_usage = sys.global_cpu_usage() as f64 / 100.0;

    (memory_usage, cpu_usage)
}
