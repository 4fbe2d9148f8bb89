use std::time::Duration;

use async_trait::async_trait;
use docqa_core::Transient;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding request timed out after {0:?}")]
    Timeout(Duration),
}

impl Transient for EmbeddingError {
    fn is_transient(&self) -> bool {
        match self {
            EmbeddingError::Http(e) => !e.is_decode() && !e.is_builder(),
            EmbeddingError::Api { status, .. } => *status == 429 || *status >= 500,
            EmbeddingError::Timeout(_) => true,
            EmbeddingError::DimensionMismatch { .. } | EmbeddingError::CountMismatch { .. } => {
                false
            }
        }
    }

    fn timed_out(after: Duration) -> Self {
        EmbeddingError::Timeout(after)
    }
}

/// Trait for embedding backends (OpenAI, Ollama, test fakes).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text]).await?;
        match vectors.pop() {
            Some(v) if vectors.is_empty() => Ok(v),
            _ => Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: vectors.len() + 1,
            }),
        }
    }
}

/// Check a provider response: one vector per input, each of the declared width.
pub(crate) fn validate_batch(
    vectors: &[Vec<f32>],
    inputs: usize,
    dimensions: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != inputs {
        return Err(EmbeddingError::CountMismatch {
            expected: inputs,
            actual: vectors.len(),
        });
    }
    match vectors.iter().find(|v| v.len() != dimensions) {
        Some(v) => Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: v.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_batch_checks_count_and_width() {
        let ok = vec![vec![0.0; 3], vec![1.0; 3]];
        assert!(validate_batch(&ok, 2, 3).is_ok());
        assert!(matches!(
            validate_batch(&ok, 3, 3),
            Err(EmbeddingError::CountMismatch { expected: 3, actual: 2 })
        ));
        let ragged = vec![vec![0.0; 3], vec![1.0; 2]];
        assert!(matches!(
            validate_batch(&ragged, 2, 3),
            Err(EmbeddingError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        let api = |status| EmbeddingError::Api {
            status,
            body: String::new(),
        };
        assert!(api(429).is_transient());
        assert!(api(503).is_transient());
        assert!(!api(400).is_transient());
        assert!(!api(401).is_transient());
        assert!(EmbeddingError::timed_out(Duration::from_secs(1)).is_transient());
        assert!(!EmbeddingError::DimensionMismatch { expected: 1, actual: 2 }.is_transient());
    }
}
