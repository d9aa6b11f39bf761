//! Model lifecycle handlers: list, detail, load, unload.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ServerError;
use crate::extract;
use crate::model_manager::ModelInfo;
use crate::models::{LoadModelRequest, LoadModelResponse, ModelCard, ModelList, UnloadModelRequest};
use crate::state::AppState;

fn model_card(info: &ModelInfo) -> ModelCard {
    ModelCard {
        id: info.model_id.clone(),
        object: "model".to_string(),
        created: info.loaded_at.timestamp(),
        owned_by: "local".to_string(),
    }
}

/// `GET /v1/models` — all loaded models, OpenAI list envelope.
pub async fn handle_list_models(State(state): State<AppState>) -> Json<ModelList> {
    let data = state
        .models
        .list_models()
        .await
        .iter()
        .map(|info| model_card(info))
        .collect();
    Json(ModelList {
        object: "list".to_string(),
        data,
    })
}

/// `GET /v1/models/{id}` — detail for one loaded model, 404 otherwise.
pub async fn handle_get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModelCard>, ServerError> {
    let info = state
        .models
        .get_model(&id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("model '{id}' is not loaded")))?;
    Ok(Json(model_card(&info)))
}

/// `POST /v1/mlx/models/load` — load a model from disk under a caller-chosen id.
///
/// Capacity overflow and engine load failures surface as 400; success is
/// `{success: true, message}`.
pub async fn handle_load_model(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<LoadModelRequest>,
) -> Result<Json<LoadModelResponse>, ServerError> {
    let message = state
        .models
        .load_model(&req.model_path, &req.model_id)
        .await?;
    Ok(Json(LoadModelResponse {
        success: true,
        message,
    }))
}

/// `POST /v1/mlx/models/unload` — drop a model from the registry.
pub async fn handle_unload_model(
    State(state): State<AppState>,
    extract::Json(req): extract::Json<UnloadModelRequest>,
) -> Result<Json<LoadModelResponse>, ServerError> {
    state.models.unload_model(&req.model_id).await?;
    Ok(Json(LoadModelResponse {
        success: true,
        message: format!("Model '{}' unloaded", req.model_id),
    }))
}
