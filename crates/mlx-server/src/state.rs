//! Application state and configuration.

use crate::model_manager::ModelManager;
use mlx_engine::MlxEngine;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared engine for inference.
    pub engine: Arc<dyn MlxEngine>,
    /// Server configuration.
    pub config: ServerConfig,
    /// Loaded-model registry (the sole cross-request synchronization point).
    pub models: Arc<ModelManager>,
    /// Process start time, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<dyn MlxEngine>, config: ServerConfig) -> Self {
        let models = ModelManager::new(engine.clone(), config.max_loaded_models);
        Self {
            engine,
            config,
            models,
            started_at: Instant::now(),
        }
    }
}

/// Server configuration parameters. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Log level filter (trace/debug/info/warn/error).
    pub log_level: String,
    /// Maximum tokens to generate when the request does not say.
    pub default_max_tokens: usize,
    /// Default temperature for sampling.
    pub default_temperature: f32,
    /// Ceiling on simultaneously loaded models.
    pub max_loaded_models: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            default_max_tokens: 512,
            default_temperature: 0.7,
            max_loaded_models: 1,
        }
    }
}
