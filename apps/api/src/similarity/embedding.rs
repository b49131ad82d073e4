use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use thiserror::Error;
use tracing::warn;

use super::lexical::jaccard_similarity;
use super::{clamp_unit, Similarity, SimilarityBackend, SimilarityMode};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding response contained no vector")]
    EmptyResponse,

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Turns text into a fixed-size vector. Implementations must return vectors of the
/// same dimensionality for every input.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model behind this embedder.
    fn id(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Raw cosine of two vectors. Zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Cosine similarity over embeddings, clamped to [0, 1].
///
/// A failed embedding call never escapes: that pair is scored with Jaccard and
/// reported in `SimilarityMode::Jaccard`. Vectors are memoized per text in a bounded
/// LRU cache, so rescoring the same resume against several job descriptions embeds
/// each skill and experience line once. A `cache_size` of 0 disables the cache.
pub struct EmbeddingSimilarity<E: Embedder> {
    embedder: E,
    cache: Option<Mutex<LruCache<String, Arc<Vec<f32>>>>>,
}

impl<E: Embedder> EmbeddingSimilarity<E> {
    pub fn new(embedder: E, cache_size: usize) -> Self {
        Self {
            embedder,
            cache: NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n))),
        }
    }

    fn vector(&self, text: &str) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                if let Some(hit) = cache.get(text) {
                    return Ok(Arc::clone(hit));
                }
            }
        }

        let vector = Arc::new(self.embedder.embed(text)?);

        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(text.to_string(), Arc::clone(&vector));
            }
        }
        Ok(vector)
    }

    fn cosine(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let va = self.vector(a)?;
        let vb = self.vector(b)?;
        cosine_similarity(&va, &vb)
    }
}

impl<E: Embedder> SimilarityBackend for EmbeddingSimilarity<E> {
    fn similarity(&self, a: &str, b: &str) -> Similarity {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Similarity {
                value: 0.0,
                mode: SimilarityMode::Embedding,
            };
        }

        match self.cosine(a, b) {
            Ok(value) => Similarity {
                value: clamp_unit(value),
                mode: SimilarityMode::Embedding,
            },
            Err(e) => {
                warn!("Embedding similarity failed ({e}); scoring this pair with Jaccard");
                Similarity {
                    value: jaccard_similarity(a, b),
                    mode: SimilarityMode::Jaccard,
                }
            }
        }
    }

    fn label(&self) -> String {
        format!("embedding:{}", self.embedder.id())
    }
}
