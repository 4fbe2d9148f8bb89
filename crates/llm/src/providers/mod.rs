pub mod claude;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use docqa_core::config::{LlmConfig, OllamaConfig};
use docqa_core::ConfigError;
use serde_json::{json, Value};
use tracing::info;

use crate::provider::{LlmProvider, Message};

/// Create the appropriate LLM provider based on config. Providers that need
/// an API key fail here when it is missing.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
    timeout: Duration,
) -> Result<Box<dyn LlmProvider>, ConfigError> {
    let api_key = llm_config.api_key()?.map(str::to_string);
    let provider: Box<dyn LlmProvider> = match (llm_config.provider.as_str(), api_key) {
        ("groq", Some(key)) => Box::new(openai::OpenAiProvider::new(
            key,
            llm_config.groq_model.clone(),
            llm_config.groq_base_url.clone(),
            timeout,
        )),
        ("openai", Some(key)) => Box::new(openai::OpenAiProvider::new(
            key,
            llm_config.openai_model.clone(),
            llm_config
                .openai_base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            timeout,
        )),
        ("anthropic" | "claude", Some(key)) => Box::new(claude::ClaudeProvider::new(
            key,
            llm_config.anthropic_model.clone(),
            timeout,
        )),
        ("ollama", _) => Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
            timeout,
        )),
        (other, _) => {
            return Err(ConfigError::UnknownProvider {
                kind: "LLM",
                name: other.to_string(),
            })
        }
    };
    info!(provider = %llm_config.provider, model = %llm_config.model(), "LLM provider ready");
    Ok(provider)
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// OpenAI-style `[{role, content}]` array, also accepted by Ollama's chat API.
fn chat_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect()
}
