use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key lookup with optional profile prefixing: `{PROFILE}_{KEY}` first, then `{KEY}`.
struct Source<'a> {
    profile: &'a str,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Source<'_> {
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            let prefixed = format!("{}_{}", self.profile, key);
            if let Some(v) = (self.lookup)(&prefixed).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        self.opt(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub resilience: ResilienceConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DOCQA_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env::var("DOCQA_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, &|key: &str| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (env, map, secrets store).
    pub fn from_lookup(profile: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let p = profile.to_uppercase();
        let src = Source {
            profile: &p,
            lookup,
        };
        Self {
            profile: p.clone(),
            llm: LlmConfig::from_source(&src),
            ollama: OllamaConfig::from_source(&src),
            embedding: EmbeddingConfig::from_source(&src),
            retrieval: RetrievalConfig::from_source(&src),
            resilience: ResilienceConfig::from_source(&src),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Check everything that must hold before the pipeline starts.
    /// A missing synthesizer credential is reported here so callers can halt
    /// before accepting any upload.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.api_key()?;
        self.embedding.check_provider()?;
        if self.embedding.provider == "openai" && self.llm.openai_api_key.is_none() {
            return Err(ConfigError::MissingCredential {
                provider: "openai embeddings".into(),
                key: "OPENAI_API_KEY".into(),
            });
        }
        self.retrieval.validate()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  llm:         provider={}, model={}", self.llm.provider, self.llm.model());
        tracing::info!("  ollama:      url={}", self.ollama.url);
        tracing::info!(
            "  embedding:   provider={}, dims={}, batch={}",
            self.embedding.provider,
            self.embedding.dimensions,
            self.embedding.batch_size
        );
        tracing::info!(
            "  retrieval:   chunk_size={}, overlap={}, top_k={}",
            self.retrieval.chunk_size,
            self.retrieval.chunk_overlap,
            self.retrieval.top_k
        );
        tracing::info!(
            "  resilience:  timeout={}s, retries={}",
            self.resilience.request_timeout_secs,
            self.resilience.max_retries
        );
    }

    /// Return a redacted view safe for display (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "llm": {
                "provider": self.llm.provider,
                "model": self.llm.model(),
                "temperature": self.llm.temperature,
                "configured": self.llm.is_configured(),
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.model },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
                "batch_size": self.embedding.batch_size,
            },
            "retrieval": {
                "chunk_size": self.retrieval.chunk_size,
                "chunk_overlap": self.retrieval.chunk_overlap,
                "top_k": self.retrieval.top_k,
            },
        })
    }
}

// ── LLM (answer synthesizer) ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "groq", "openai", "anthropic", "ollama"
    pub provider: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_source(src: &Source<'_>) -> Self {
        Self {
            provider: src.or("LLM_PROVIDER", "groq").to_lowercase(),
            groq_api_key: src.opt("GROQ_API_KEY"),
            groq_model: src.or("GROQ_MODEL", "llama3-70b-8192"),
            groq_base_url: src.or("GROQ_BASE_URL", "https://api.groq.com/openai"),
            openai_api_key: src.opt("OPENAI_API_KEY"),
            openai_model: src.or("OPENAI_MODEL", "gpt-4o"),
            openai_base_url: src.opt("OPENAI_BASE_URL"),
            anthropic_api_key: src.opt("ANTHROPIC_API_KEY"),
            anthropic_model: src.or("ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            temperature: src.parsed("LLM_TEMPERATURE", 0.2),
            max_tokens: src.parsed("LLM_MAX_TOKENS", 1024),
        }
    }

    /// The API key the configured provider needs. `Ok(None)` for providers
    /// that run without one (ollama).
    pub fn api_key(&self) -> Result<Option<&str>, ConfigError> {
        let (key, value) = match self.provider.as_str() {
            "groq" => ("GROQ_API_KEY", &self.groq_api_key),
            "openai" => ("OPENAI_API_KEY", &self.openai_api_key),
            "anthropic" | "claude" => ("ANTHROPIC_API_KEY", &self.anthropic_api_key),
            "ollama" => return Ok(None),
            other => {
                return Err(ConfigError::UnknownProvider {
                    kind: "LLM",
                    name: other.to_string(),
                })
            }
        };
        value
            .as_deref()
            .map(Some)
            .ok_or_else(|| ConfigError::MissingCredential {
                provider: self.provider.clone(),
                key: key.to_string(),
            })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    /// Model name for the active provider.
    pub fn model(&self) -> &str {
        match self.provider.as_str() {
            "groq" => &self.groq_model,
            "openai" => &self.openai_model,
            "anthropic" | "claude" => &self.anthropic_model,
            _ => "",
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_source(src: &Source<'_>) -> Self {
        Self {
            url: src.or("OLLAMA_URL", "http://localhost:11434"),
            model: src.or("OLLAMA_MODEL", "llama3.2"),
            embedding_model: src.or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama", "openai"
    pub provider: String,
    /// Model for OpenAI-compatible embedding endpoints.
    pub model: String,
    pub dimensions: u32,
    pub batch_size: u32,
    /// LRU capacity for repeated texts (0 disables the cache).
    pub cache_capacity: u32,
}

impl EmbeddingConfig {
    fn from_source(src: &Source<'_>) -> Self {
        let provider = src.or("EMBEDDING_PROVIDER", "ollama").to_lowercase();
        // Native widths of nomic-embed-text and text-embedding-3-small.
        let default_dimensions = match provider.as_str() {
            "openai" => 1536,
            _ => 768,
        };
        Self {
            provider,
            model: src.or("EMBEDDING_MODEL", "text-embedding-3-small"),
            dimensions: src.parsed("EMBEDDING_DIMENSIONS", default_dimensions),
            batch_size: src.parsed("EMBEDDING_BATCH_SIZE", 64),
            cache_capacity: src.parsed("EMBEDDING_CACHE_CAPACITY", 1024),
        }
    }

    fn check_provider(&self) -> Result<(), ConfigError> {
        match self.provider.as_str() {
            "ollama" | "openai" => Ok(()),
            other => Err(ConfigError::UnknownProvider {
                kind: "embedding",
                name: other.to_string(),
            }),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 3,
        }
    }
}

impl RetrievalConfig {
    fn from_source(src: &Source<'_>) -> Self {
        let d = Self::default();
        Self {
            chunk_size: src.parsed("CHUNK_SIZE", d.chunk_size),
            chunk_overlap: src.parsed("CHUNK_OVERLAP", d.chunk_overlap),
            top_k: src.parsed("RETRIEVAL_TOP_K", d.top_k),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                key: "CHUNK_SIZE".into(),
                reason: "must be positive".into(),
            });
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::Invalid {
                key: "CHUNK_OVERLAP".into(),
                reason: format!(
                    "overlap {} must be smaller than chunk size {}",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }
        Ok(())
    }
}

// ── Timeouts and retries for external calls ───────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            max_retries: 3,
            retry_initial_delay_ms: 200,
            retry_max_delay_ms: 2000,
        }
    }
}

impl ResilienceConfig {
    fn from_source(src: &Source<'_>) -> Self {
        let d = Self::default();
        Self {
            request_timeout_secs: src.parsed("REQUEST_TIMEOUT_SECS", d.request_timeout_secs),
            max_retries: src.parsed("MAX_RETRIES", d.max_retries),
            retry_initial_delay_ms: src.parsed("RETRY_INITIAL_DELAY_MS", d.retry_initial_delay_ms),
            retry_max_delay_ms: src.parsed("RETRY_MAX_DELAY_MS", d.retry_max_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            backoff_factor: 1.5,
            attempt_timeout: self.request_timeout(),
        }
    }
}
