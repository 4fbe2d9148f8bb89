pub mod cache;
pub mod ollama;
pub mod openai;
pub mod retry;
pub mod traits;

use std::sync::Arc;

use docqa_core::{Config, ConfigError};
use tracing::info;

pub use cache::{CachedEmbedder, EmbeddingCache};
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use retry::RetryingEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the configured embedding provider, wrapped with retries and (when
/// `EMBEDDING_CACHE_CAPACITY > 0`) an LRU cache.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>, ConfigError> {
    let timeout = config.resilience.request_timeout();
    let dimensions = config.embedding.dimensions as usize;

    let provider: Arc<dyn Embedder> = match config.embedding.provider.as_str() {
        "ollama" => {
            info!(
                "Embedding provider ready: ollama (model: {}, dims: {})",
                config.ollama.embedding_model, dimensions
            );
            Arc::new(OllamaEmbedder::new(
                config.ollama.url.clone(),
                config.ollama.embedding_model.clone(),
                dimensions,
                timeout,
            ))
        }
        "openai" => {
            let api_key = config.llm.openai_api_key.clone().ok_or_else(|| {
                ConfigError::MissingCredential {
                    provider: "openai embeddings".into(),
                    key: "OPENAI_API_KEY".into(),
                }
            })?;
            info!(
                "Embedding provider ready: openai (model: {}, dims: {})",
                config.embedding.model, dimensions
            );
            Arc::new(OpenAiEmbedder::new(
                api_key,
                config.embedding.model.clone(),
                config.llm.openai_base_url.clone(),
                dimensions,
                timeout,
            ))
        }
        other => {
            return Err(ConfigError::UnknownProvider {
                kind: "embedding",
                name: other.to_string(),
            })
        }
    };

    let retrying: Arc<dyn Embedder> = Arc::new(RetryingEmbedder::new(
        provider,
        config.resilience.retry_policy(),
    ));
    match config.embedding.cache_capacity {
        0 => Ok(retrying),
        capacity => Ok(Arc::new(CachedEmbedder::new(retrying, capacity as usize))),
    }
}
