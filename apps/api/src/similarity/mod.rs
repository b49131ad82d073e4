//! Similarity provider — bounded [0, 1] similarity between two text blobs.
//!
//! One trait, `SimilarityBackend`, two implementations:
//! - `LexicalSimilarity`: token-set Jaccard, pure function, always available.
//! - `EmbeddingSimilarity<E>`: cosine similarity over embeddings from any `Embedder`,
//!   degrading to Jaccard for a single pair whenever the embedder fails.
//!
//! The backend is chosen once at startup by `select_backend` and injected into the
//! scoring engine as `Arc<dyn SimilarityBackend>`. Every result carries the
//! `SimilarityMode` that produced it so diagnostics can show which path ran.

pub mod embedding;
pub mod http;
pub mod lexical;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EmbeddingConfig;

pub use embedding::EmbeddingSimilarity;
pub use http::HttpEmbedder;
pub use lexical::LexicalSimilarity;

/// Which computation produced a similarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    Embedding,
    Jaccard,
}

/// A similarity value in [0, 1] together with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub value: f64,
    pub mode: SimilarityMode,
}

/// The similarity contract the scorers depend on. Implementations never fail:
/// internal errors degrade to the Jaccard fallback.
pub trait SimilarityBackend: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Similarity;

    /// Human-readable backend name, e.g. `jaccard` or `embedding:http:all-minilm`.
    fn label(&self) -> String;
}

/// Clamps to [0, 1]; NaN collapses to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Summary of the modes seen across a group of similarity calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSummary {
    Embedding,
    Jaccard,
    Mixed,
}

/// Counts modes while a scorer makes its similarity calls.
#[derive(Debug, Default)]
pub struct ModeTally {
    embedding: usize,
    jaccard: usize,
}

impl ModeTally {
    /// Records the mode and hands back the value.
    pub fn record(&mut self, similarity: Similarity) -> f64 {
        match similarity.mode {
            SimilarityMode::Embedding => self.embedding += 1,
            SimilarityMode::Jaccard => self.jaccard += 1,
        }
        similarity.value
    }

    pub fn summary(&self) -> ModeSummary {
        match (self.embedding, self.jaccard) {
            (0, _) => ModeSummary::Jaccard,
            (_, 0) => ModeSummary::Embedding,
            _ => ModeSummary::Mixed,
        }
    }
}

/// Builds the process-wide similarity backend.
///
/// Without an embedding endpoint, or when the startup probe fails, the process runs
/// on Jaccard similarity for its whole lifetime; initialization is never retried.
///
/// Uses a blocking HTTP client: call it outside the async runtime (or inside
/// `spawn_blocking`).
pub fn select_backend(config: Option<&EmbeddingConfig>) -> Arc<dyn SimilarityBackend> {
    let Some(cfg) = config else {
        info!("No EMBEDDING_URL configured; similarity runs in Jaccard mode");
        return Arc::new(LexicalSimilarity);
    };

    match HttpEmbedder::connect(cfg) {
        Ok(embedder) => {
            let backend = EmbeddingSimilarity::new(embedder, cfg.cache_size);
            info!("Similarity backend: {}", backend.label());
            Arc::new(backend)
        }
        Err(e) => {
            warn!(
                "Embedding backend at {} unavailable ({e}); using Jaccard similarity for the rest of this process",
                cfg.url
            );
            Arc::new(LexicalSimilarity)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Deterministic embedders for exercising the embedding path without a model.

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::embedding::{Embedder, EmbeddingError};
    use super::lexical::tokenize;

    const DIM: usize = 64;

    /// Hashes each lowercase token into a bucket; identical token sets embed identically.
    #[derive(Default)]
    pub struct BagOfWordsEmbedder {
        pub calls: Arc<AtomicUsize>,
    }

    impl Embedder for BagOfWordsEmbedder {
        fn id(&self) -> &str {
            "test:bag-of-words"
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut v = vec![0f32; DIM];
            for token in tokenize(text) {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                v[(hasher.finish() as usize) % DIM] += 1.0;
            }
            Ok(v)
        }
    }

    /// Always errors, as a crashed embedding service would.
    pub struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn id(&self) -> &str {
            "test:failing"
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::EmptyResponse)
        }
    }

    /// Returns a fixed vector per call, cycling through `vectors`.
    pub struct ScriptedEmbedder {
        pub vectors: Vec<Vec<f32>>,
        pub next: AtomicUsize,
    }

    impl ScriptedEmbedder {
        pub fn new(vectors: Vec<Vec<f32>>) -> Self {
            Self {
                vectors,
                next: AtomicUsize::new(0),
            }
        }
    }

    impl Embedder for ScriptedEmbedder {
        fn id(&self) -> &str {
            "test:scripted"
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            Ok(self.vectors[i % self.vectors.len()].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit_bounds_and_nan() {
        assert_eq!(clamp_unit(1.0000001), 1.0);
        assert_eq!(clamp_unit(-0.3), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }

    #[test]
    fn test_mode_tally_summaries() {
        let emb = Similarity { value: 0.5, mode: SimilarityMode::Embedding };
        let jac = Similarity { value: 0.25, mode: SimilarityMode::Jaccard };

        let mut tally = ModeTally::default();
        assert_eq!(tally.record(emb), 0.5);
        assert_eq!(tally.summary(), ModeSummary::Embedding);

        tally.record(jac);
        assert_eq!(tally.summary(), ModeSummary::Mixed);

        let mut lexical_only = ModeTally::default();
        lexical_only.record(jac);
        assert_eq!(lexical_only.summary(), ModeSummary::Jaccard);
    }

    #[test]
    fn test_select_backend_without_endpoint_is_jaccard() {
        let backend = select_backend(None);
        assert_eq!(backend.label(), "jaccard");
        let s = backend.similarity("python developer", "python developer");
        assert_eq!(s.mode, SimilarityMode::Jaccard);
        assert!((s.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_select_backend_unreachable_endpoint_falls_back() {
        let cfg = EmbeddingConfig {
            url: "http://127.0.0.1:9/v1/embeddings".to_string(),
            model: "all-minilm".to_string(),
            api_key: None,
            timeout_secs: 1,
            cache_size: 16,
        };
        let backend = select_backend(Some(&cfg));
        assert_eq!(backend.label(), "jaccard");
    }
}
