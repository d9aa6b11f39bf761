//! # mlx-runtime
//!
//! Backend selection for the MLX server stack. The native tensor runtime is
//! accessed only through the [`MlxEngine`] trait, so this crate is where
//! concrete backends live. The shipped backend is [`MockEngine`], a
//! deterministic test double; real MLX bindings implement the same trait.

use std::thread;

use mlx_engine::{
    EngineError, FragmentStream, GenerationParams, LoadedModel, MlxEngine, ModelHandle, Result,
    TokenizerHandle,
};
use tokio_util::sync::CancellationToken;

/// Default completion text when no canned reply is configured.
const DEFAULT_REPLY: &str = "This is a mock completion from the MLX runtime.";

/// Vocabulary size the mock tokenizer reports.
const MOCK_VOCAB_SIZE: usize = 32_000;

/// Deterministic mock backend.
///
/// Completions are a canned reply truncated to `max_tokens` whitespace
/// tokens, so streaming and non-streaming output are guaranteed to
/// concatenate to the same text. Token counting is whitespace splitting.
pub struct MockEngine {
    reply: String,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            reply: DEFAULT_REPLY.to_string(),
        }
    }

    /// Use a fixed completion text instead of the default.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    /// The completion for the given parameters, before fragmenting.
    fn completion(&self, params: &GenerationParams) -> String {
        let words: Vec<&str> = self.reply.split_whitespace().collect();
        let take = params.max_tokens.min(words.len());
        words[..take].join(" ")
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MlxEngine for MockEngine {
    fn load(&self, path: &str) -> Result<LoadedModel> {
        if path.is_empty() {
            return Err(EngineError::ModelLoad("empty model path".to_string()));
        }
        // The real backend validates weight files here; the mock only
        // rejects paths that advertise themselves as broken.
        if path.contains("invalid") {
            return Err(EngineError::ModelLoad(format!(
                "no model found at {path}"
            )));
        }
        tracing::debug!(path, "mock model loaded");
        Ok(LoadedModel {
            model: ModelHandle {
                path: path.to_string(),
            },
            tokenizer: TokenizerHandle {
                vocab_size: MOCK_VOCAB_SIZE,
            },
        })
    }

    fn generate(
        &self,
        _model: &ModelHandle,
        _tokenizer: &TokenizerHandle,
        _prompt: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        Ok(self.completion(params))
    }

    fn generate_stream(
        &self,
        _model: &ModelHandle,
        _tokenizer: &TokenizerHandle,
        _prompt: &str,
        params: &GenerationParams,
        cancel: CancellationToken,
    ) -> Result<FragmentStream> {
        let text = self.completion(params);
        let (tx, stream) = FragmentStream::channel();

        // Producer runs on its own thread, like a real decode loop would.
        thread::Builder::new()
            .name("mock-decode".into())
            .spawn(move || {
                let words: Vec<String> = text.split_whitespace().map(String::from).collect();
                let last = words.len().saturating_sub(1);
                for (i, word) in words.into_iter().enumerate() {
                    if cancel.is_cancelled() {
                        tracing::debug!("mock generation cancelled");
                        return;
                    }
                    let fragment = if i == last { word } else { format!("{word} ") };
                    // A closed channel means the consumer dropped the stream.
                    if tx.blocking_send(Ok(fragment)).is_err() {
                        return;
                    }
                }
            })
            .map_err(|e| EngineError::Generation(format!("failed to spawn decode thread: {e}")))?;

        Ok(stream)
    }

    fn count_tokens(&self, _tokenizer: &TokenizerHandle, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_tokens: usize) -> GenerationParams {
        GenerationParams {
            max_tokens,
            temperature: 0.0,
            top_p: None,
        }
    }

    #[test]
    fn load_rejects_empty_path() {
        let engine = MockEngine::new();
        assert!(matches!(
            engine.load(""),
            Err(EngineError::ModelLoad(_))
        ));
    }

    #[test]
    fn generate_truncates_to_max_tokens() {
        let engine = MockEngine::with_reply("one two three four five");
        let loaded = engine.load("/models/test").unwrap();
        let out = engine
            .generate(&loaded.model, &loaded.tokenizer, "hi", &params(3))
            .unwrap();
        assert_eq!(out, "one two three");
    }

    #[test]
    fn count_tokens_is_pure() {
        let engine = MockEngine::new();
        let loaded = engine.load("/models/test").unwrap();
        let n1 = engine.count_tokens(&loaded.tokenizer, "a b c");
        let n2 = engine.count_tokens(&loaded.tokenizer, "a b c");
        assert_eq!(n1, 3);
        assert_eq!(n1, n2);
        assert_eq!(engine.count_tokens(&loaded.tokenizer, ""), 0);
    }

    #[tokio::test]
    async fn stream_concatenates_to_generate_output() {
        let engine = MockEngine::new();
        let loaded = engine.load("/models/test").unwrap();
        let p = params(64);

        let full = engine
            .generate(&loaded.model, &loaded.tokenizer, "hi", &p)
            .unwrap();

        let mut stream = engine
            .generate_stream(
                &loaded.model,
                &loaded.tokenizer,
                "hi",
                &p,
                CancellationToken::new(),
            )
            .unwrap();

        let mut collected = String::new();
        while let Some(fragment) = stream.next().await {
            collected.push_str(&fragment.unwrap());
        }
        assert_eq!(collected, full);
    }

    #[tokio::test]
    async fn cancellation_stops_fragment_production() {
        let engine = MockEngine::with_reply(&"word ".repeat(1000));
        let loaded = engine.load("/models/test").unwrap();
        let cancel = CancellationToken::new();

        let mut stream = engine
            .generate_stream(
                &loaded.model,
                &loaded.tokenizer,
                "hi",
                &params(1000),
                cancel.clone(),
            )
            .unwrap();

        // Pull a couple of fragments, then cancel.
        assert!(stream.next().await.is_some());
        cancel.cancel();

        // The producer stops; the stream must terminate rather than hang.
        let mut remaining = 0;
        while stream.next().await.is_some() {
            remaining += 1;
        }
        // At most the channel capacity plus one blocked send could already
        // be in flight when the cancel lands.
        assert!(remaining <= FragmentStream::CHANNEL_CAPACITY + 1);
    }
}
