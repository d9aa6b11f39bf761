//! # mlx-engine
//!
//! The "narrow waist" of the MLX server stack. Defines the core [`MlxEngine`]
//! trait and associated types that all other crates depend on. The native ML
//! runtime is treated as an opaque capability — load, generate,
//! generate_stream, count_tokens — so backends (real MLX bindings, test
//! doubles) can swap without changing application code.
//!
//! ## Design Notes
//!
//! ### Interior Mutability
//! `MlxEngine` methods take `&self` (not `&mut self`) to allow shared access
//! across concurrent requests. Backends using interior mutability are
//! responsible for their own thread safety; per-model serialization is the
//! caller's job (the server holds a generation lock per loaded model).
//!
//! ### Streaming
//! [`generate_stream`](MlxEngine::generate_stream) hands back a
//! [`FragmentStream`]: a lazy, finite, non-restartable sequence of text
//! fragments delivered over a bounded channel. The producer side runs on a
//! backend-owned thread and stops promptly when the [`CancellationToken`]
//! fires. For a deterministic decoding configuration, the concatenation of
//! all fragments equals the non-streaming [`generate`](MlxEngine::generate)
//! output for the same inputs.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level error type for all engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Tokenization failed: {0}")]
    Tokenization(String),
}

/// Opaque handle to a loaded model's weights inside the runtime.
#[derive(Debug)]
pub struct ModelHandle {
    /// Filesystem path the model was loaded from.
    pub path: String,
}

/// Opaque handle to a model's tokenizer.
#[derive(Debug)]
pub struct TokenizerHandle {
    /// Vocabulary size reported by the runtime.
    pub vocab_size: usize,
}

/// Result of a successful model load: weights plus tokenizer.
#[derive(Debug)]
pub struct LoadedModel {
    pub model: ModelHandle,
    pub tokenizer: TokenizerHandle,
}

/// Decoding parameters for a single generation call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate.
    pub max_tokens: usize,
    /// Sampling temperature. Zero means greedy (deterministic) decoding.
    pub temperature: f32,
    /// Nucleus sampling cutoff, if any.
    pub top_p: Option<f32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: None,
        }
    }
}

/// A lazy, finite, non-restartable stream of completion fragments.
///
/// The producer (backend thread) pushes fragments into a bounded channel;
/// the consumer pulls with [`next`](FragmentStream::next) until exhaustion.
/// Dropping the stream closes the channel, which the producer observes as a
/// send failure and treats as cancellation.
pub struct FragmentStream {
    rx: mpsc::Receiver<Result<String>>,
}

impl FragmentStream {
    /// Channel capacity for fragment streams. Small on purpose: the producer
    /// suspends between fragment production and network flush.
    pub const CHANNEL_CAPACITY: usize = 16;

    /// Create a stream plus the sender half for the producing backend.
    pub fn channel() -> (mpsc::Sender<Result<String>>, Self) {
        let (tx, rx) = mpsc::channel(Self::CHANNEL_CAPACITY);
        (tx, Self { rx })
    }

    /// Pull the next fragment. `None` means the stream is exhausted.
    pub async fn next(&mut self) -> Option<Result<String>> {
        self.rx.recv().await
    }
}

/// The core engine trait — everything else plugs into this.
///
/// Implementations wrap the native ML runtime. The server depends on engine
/// *behavior*, not implementation details, so the mock backend used in tests
/// and the real MLX bindings are interchangeable here.
pub trait MlxEngine: Send + Sync {
    /// Load a model (weights + tokenizer) from disk. Blocking from the
    /// caller's perspective.
    fn load(&self, path: &str) -> Result<LoadedModel>;

    /// Produce a full completion for the prompt synchronously.
    fn generate(
        &self,
        model: &ModelHandle,
        tokenizer: &TokenizerHandle,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Produce a completion as an incremental fragment stream.
    ///
    /// Fragment production must stop promptly once `cancel` fires or the
    /// returned stream is dropped.
    fn generate_stream(
        &self,
        model: &ModelHandle,
        tokenizer: &TokenizerHandle,
        prompt: &str,
        params: &GenerationParams,
        cancel: CancellationToken,
    ) -> Result<FragmentStream>;

    /// Count the tokens `text` occupies under the model's tokenizer.
    /// Pure function of the tokenizer; used for usage accounting.
    fn count_tokens(&self, tokenizer: &TokenizerHandle, text: &str) -> usize;
}
