//! Answer synthesis over retrieved chunks using the "stuff" strategy: every
//! chunk is placed verbatim into one prompt and the model answers in a single
//! call.

use docqa_core::{Chunk, Config, ConfigError, RetryPolicy};
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

/// Placeholder in the system prompt that receives the joined chunk texts.
const CONTEXT_PLACEHOLDER: &str = "<<<context>>>";

const STUFF_SYSTEM_TEMPLATE: &str = "Use the following pieces of context to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.
----------------
<<<context>>>";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("LLM is not initialized: {0}")]
    Initialization(#[from] ConfigError),
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("LLM returned an empty answer")]
    EmptyAnswer,
}

#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

impl SynthesisSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            retry: config.resilience.retry_policy(),
        }
    }
}

/// Produces an answer from a question and the chunks retrieved for it.
pub struct AnswerSynthesizer {
    provider: Box<dyn LlmProvider>,
    settings: SynthesisSettings,
}

impl AnswerSynthesizer {
    pub fn new(provider: Box<dyn LlmProvider>, settings: SynthesisSettings) -> Self {
        Self { provider, settings }
    }

    /// Build from config, creating the configured provider. Fails when the
    /// provider's credential is missing.
    pub fn from_config(config: &Config) -> Result<Self, SynthesisError> {
        let provider = create_provider(
            &config.llm,
            &config.ollama,
            config.resilience.request_timeout(),
        )?;
        Ok(Self::new(provider, SynthesisSettings::from_config(config)))
    }

    /// System prompt with the chunk texts joined by blank lines, then the
    /// question as the user turn.
    pub fn build_messages(question: &str, chunks: &[Chunk]) -> Vec<Message> {
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        vec![
            Message::system(STUFF_SYSTEM_TEMPLATE.replace(CONTEXT_PLACEHOLDER, &context)),
            Message::user(question),
        ]
    }

    pub async fn synthesize(&self, question: &str, chunks: &[Chunk]) -> Result<String, SynthesisError> {
        let messages = Self::build_messages(question, chunks);
        debug!(
            chunks = chunks.len(),
            prompt_chars = messages.iter().map(|m| m.content.chars().count()).sum::<usize>(),
            "synthesizing answer"
        );

        let reply = self
            .settings
            .retry
            .run("synthesize", || {
                self.provider.complete(
                    messages.clone(),
                    self.settings.temperature,
                    self.settings.max_tokens,
                )
            })
            .await?;

        let answer = reply.trim();
        if answer.is_empty() {
            return Err(SynthesisError::EmptyAnswer);
        }
        info!(chunks = chunks.len(), answer_chars = answer.chars().count(), "answer synthesized");
        Ok(answer.to_string())
    }
}
