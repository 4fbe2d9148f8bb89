//! Fakes shared by the unit tests in this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docqa_core::Chunk;
use docqa_ingest::{Embedder, EmbeddingError};
use docqa_llm::{LlmError, LlmProvider, Message};

pub(crate) const KEYWORD_DIMS: usize = 64;

#[derive(Clone, Copy)]
enum Mode {
    /// Bag of words; each word lands in bucket `byte_sum % KEYWORD_DIMS`.
    Keyword,
    /// Same vector of the given width for every text.
    Constant(usize),
    /// Width equal to the text's byte length.
    Ragged,
}

pub(crate) struct FakeEmbedder {
    mode: Mode,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl FakeEmbedder {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            fail_on_call: None,
        }
    }

    pub(crate) fn keyword() -> Self {
        Self::with_mode(Mode::Keyword)
    }

    pub(crate) fn constant(dims: usize) -> Self {
        Self::with_mode(Mode::Constant(dims))
    }

    pub(crate) fn ragged() -> Self {
        Self::with_mode(Mode::Ragged)
    }

    /// Fail the `n`th `embed_batch` call (1-based) with a server error.
    pub(crate) fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        match self.mode {
            Mode::Keyword => {
                let mut v = vec![0.0; KEYWORD_DIMS];
                for word in text
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                {
                    let sum: usize = word.to_lowercase().bytes().map(usize::from).sum();
                    v[sum % KEYWORD_DIMS] += 1.0;
                }
                v
            }
            Mode::Constant(dims) => vec![1.0; dims],
            Mode::Ragged => vec![1.0; text.len()],
        }
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(EmbeddingError::Api {
                status: 500,
                body: "embedding backend down".into(),
            });
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        match self.mode {
            Mode::Keyword => KEYWORD_DIMS,
            Mode::Constant(dims) => dims,
            Mode::Ragged => 0,
        }
    }
}

/// Answers with a fixed reply and records every prompt.
pub(crate) struct RecordingProvider {
    reply: String,
    pub(crate) prompts: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl RecordingProvider {
    pub(crate) fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::default(),
        }
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(messages);
        Ok(self.reply.clone())
    }
}

pub(crate) fn chunks(texts: &[&str]) -> Vec<Chunk> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Chunk {
            index,
            content: text.to_string(),
            source: "test.txt".into(),
            page: None,
            char_offset: 0,
        })
        .collect()
}
