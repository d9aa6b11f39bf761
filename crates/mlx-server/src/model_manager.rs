//! Loaded-model registry and lifecycle.
//!
//! The manager owns every [`ModelInfo`] and is the only synchronization
//! point shared across requests. Loads and unloads take the registry write
//! lock, which serializes concurrent lifecycle operations — at most one
//! effective load per model id. On a full registry a load is rejected with
//! a capacity error; nothing is ever evicted implicitly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mlx_engine::{MlxEngine, ModelHandle, TokenizerHandle};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::error::ServerError;

/// A loaded model: engine handles plus bookkeeping.
///
/// Owned exclusively by the [`ModelManager`]; handlers get an `Arc` and
/// borrow the handles per call. Not `Clone` — duplicating a model handle is
/// not a well-defined operation.
pub struct ModelInfo {
    pub model_id: String,
    pub model: ModelHandle,
    pub tokenizer: TokenizerHandle,
    pub loaded_at: DateTime<Utc>,
    /// Generation is single-threaded per model in the native runtime, so
    /// requests against the same model queue on this lock.
    generation_lock: Arc<Mutex<()>>,
}

impl ModelInfo {
    /// Acquire the model's generation slot. The owned guard can be moved
    /// into a response stream and released when the stream is dropped.
    pub async fn acquire_generation(&self) -> OwnedMutexGuard<()> {
        self.generation_lock.clone().lock_owned().await
    }
}

/// Registry of loaded models, keyed by caller-chosen model id.
pub struct ModelManager {
    engine: Arc<dyn MlxEngine>,
    max_loaded_models: usize,
    registry: RwLock<HashMap<String, Arc<ModelInfo>>>,
}

impl ModelManager {
    pub fn new(engine: Arc<dyn MlxEngine>, max_loaded_models: usize) -> Arc<Self> {
        Arc::new(Self {
            engine,
            max_loaded_models,
            registry: RwLock::new(HashMap::new()),
        })
    }

    /// Load a model from `path` under `id`.
    ///
    /// Idempotent per id: re-loading an already-loaded id succeeds without
    /// touching the engine. Loading is blocking from the caller's
    /// perspective; the write lock held across the engine call is what
    /// serializes racing loads for the same id.
    pub async fn load_model(&self, path: &str, id: &str) -> Result<String, ServerError> {
        if id.is_empty() {
            return Err(ServerError::Validation("model_id must not be empty".into()));
        }

        let mut registry = self.registry.write().await;

        if registry.contains_key(id) {
            tracing::debug!(model_id = id, "model already loaded");
            return Ok(format!("Model '{id}' already loaded"));
        }

        if registry.len() >= self.max_loaded_models {
            return Err(ServerError::Capacity(format!(
                "cannot load '{id}': {} of {} model slots in use",
                registry.len(),
                self.max_loaded_models
            )));
        }

        let loaded = self
            .engine
            .load(path)
            .map_err(|e| ServerError::LoadFailed(e.to_string()))?;

        tracing::info!(model_id = id, path, "model loaded");
        registry.insert(
            id.to_string(),
            Arc::new(ModelInfo {
                model_id: id.to_string(),
                model: loaded.model,
                tokenizer: loaded.tokenizer,
                loaded_at: Utc::now(),
                generation_lock: Arc::new(Mutex::new(())),
            }),
        );

        Ok(format!("Model '{id}' loaded successfully"))
    }

    /// Unload a model by id. In-flight generations keep their `Arc` alive
    /// until they finish; the id just stops resolving.
    pub async fn unload_model(&self, id: &str) -> Result<(), ServerError> {
        let mut registry = self.registry.write().await;
        match registry.remove(id) {
            Some(_) => {
                tracing::info!(model_id = id, "model unloaded");
                Ok(())
            }
            None => Err(ServerError::NotFound(format!("model '{id}' is not loaded"))),
        }
    }

    /// Resolve a model id to its info, if loaded.
    pub async fn get_model(&self, id: &str) -> Option<Arc<ModelInfo>> {
        self.registry.read().await.get(id).cloned()
    }

    /// Snapshot of all loaded models, ordered by load time.
    pub async fn list_models(&self) -> Vec<Arc<ModelInfo>> {
        let registry = self.registry.read().await;
        let mut models: Vec<_> = registry.values().cloned().collect();
        models.sort_by_key(|m| m.loaded_at);
        models
    }

    /// Number of currently loaded models.
    pub async fn loaded_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Ceiling on simultaneously loaded models.
    pub fn max_loaded_models(&self) -> usize {
        self.max_loaded_models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlx_runtime::MockEngine;

    fn manager(max: usize) -> Arc<ModelManager> {
        ModelManager::new(Arc::new(MockEngine::new()), max)
    }

    #[tokio::test]
    async fn load_then_get() {
        let mgr = manager(2);
        mgr.load_model("/models/a", "a").await.unwrap();
        let info = mgr.get_model("a").await.expect("model should resolve");
        assert_eq!(info.model_id, "a");
        assert_eq!(mgr.loaded_count().await, 1);
    }

    #[tokio::test]
    async fn load_is_idempotent_per_id() {
        let mgr = manager(1);
        mgr.load_model("/models/a", "a").await.unwrap();
        let msg = mgr.load_model("/models/a", "a").await.unwrap();
        assert!(msg.contains("already loaded"));
        assert_eq!(mgr.loaded_count().await, 1);
    }

    #[tokio::test]
    async fn capacity_overflow_rejects_without_evicting() {
        let mgr = manager(1);
        mgr.load_model("/models/a", "a").await.unwrap();
        let err = mgr.load_model("/models/b", "b").await.unwrap_err();
        assert!(matches!(err, ServerError::Capacity(_)));
        // The loaded model is untouched.
        assert!(mgr.get_model("a").await.is_some());
        assert!(mgr.get_model("b").await.is_none());
    }

    #[tokio::test]
    async fn engine_failure_maps_to_load_failed() {
        let mgr = manager(1);
        let err = mgr.load_model("/invalid/path", "x").await.unwrap_err();
        assert!(matches!(err, ServerError::LoadFailed(_)));
        assert_eq!(mgr.loaded_count().await, 0);
    }

    #[tokio::test]
    async fn unload_removes_and_unknown_is_not_found() {
        let mgr = manager(1);
        mgr.load_model("/models/a", "a").await.unwrap();
        mgr.unload_model("a").await.unwrap();
        assert!(mgr.get_model("a").await.is_none());
        assert!(matches!(
            mgr.unload_model("a").await.unwrap_err(),
            ServerError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn concurrent_loads_same_id_load_once() {
        let mgr = manager(4);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let mgr = mgr.clone();
            handles.push(tokio::spawn(async move {
                mgr.load_model("/models/a", "a").await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(mgr.loaded_count().await, 1);
    }
}
