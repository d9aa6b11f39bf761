//! Model lifecycle request/response types (`/v1/models`, `/v1/mlx/models/*`).

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/mlx/models/load`.
#[derive(Debug, Deserialize)]
pub struct LoadModelRequest {
    pub model_path: String,
    pub model_id: String,
}

/// Response body for load/unload operations.
#[derive(Debug, Serialize)]
pub struct LoadModelResponse {
    pub success: bool,
    pub message: String,
}

/// Request body for `POST /v1/mlx/models/unload`.
#[derive(Debug, Deserialize)]
pub struct UnloadModelRequest {
    pub model_id: String,
}

/// A loaded model as reported by `/v1/models`.
#[derive(Debug, Serialize)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

/// Response body for `GET /v1/models`.
#[derive(Debug, Serialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelCard>,
}
