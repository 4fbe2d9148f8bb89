//! One user's question-answering session: the uploaded batch, its index, and
//! the collaborators needed to answer questions over it.

use std::sync::Arc;

use docqa_core::{Config, ConfigError, Upload};
use docqa_ingest::{chunk_segments, load_upload, ChunkConfig, Embedder};
use docqa_llm::{AnswerSynthesizer, SynthesisError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::index::{IndexBuildError, SearchError, VectorIndex, DEFAULT_BATCH_SIZE};
use crate::language::AnswerLanguage;
use crate::retriever::{RetrievedSet, Retriever};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build index: {0}")]
    Index(#[from] IndexBuildError),
    #[error("retrieval failed: {0}")]
    Search(#[from] SearchError),
    #[error("answer synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub chunking: ChunkConfig,
    pub top_k: usize,
    pub batch_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            top_k: Retriever::DEFAULT_TOP_K,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let chunking = ChunkConfig::try_from(&config.retrieval).map_err(|e| ConfigError::Invalid {
            key: "CHUNK_SIZE/CHUNK_OVERLAP".into(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            chunking,
            top_k: config.retrieval.top_k,
            batch_size: config.embedding.batch_size as usize,
        })
    }
}

/// A question plus the language the answer should be written in.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub question: String,
    pub language: AnswerLanguage,
}

impl Query {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            language: AnswerLanguage::default(),
        }
    }

    pub fn with_language(mut self, language: AnswerLanguage) -> Self {
        self.language = language;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub language: AnswerLanguage,
    pub retrieved: RetrievedSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedUpload {
    pub name: String,
    pub reason: String,
}

/// Outcome of one upload batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub accepted: Vec<String>,
    pub rejected: Vec<RejectedUpload>,
    pub segments: usize,
    pub chunks: usize,
}

pub struct Session {
    embedder: Arc<dyn Embedder>,
    synthesizer: AnswerSynthesizer,
    retriever: Retriever,
    options: SessionOptions,
    index: Option<VectorIndex>,
}

impl Session {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        synthesizer: AnswerSynthesizer,
        options: SessionOptions,
    ) -> Self {
        let retriever = Retriever::new(embedder.clone(), options.top_k);
        Self {
            embedder,
            synthesizer,
            retriever,
            options,
            index: None,
        }
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Load, chunk and index a batch of uploads, replacing any previous index.
    ///
    /// Unsupported or unreadable files are reported and skipped. An empty
    /// batch leaves the session without an index. If embedding fails the
    /// session is left without an index until the next successful batch.
    pub async fn ingest(&mut self, uploads: Vec<Upload>) -> Result<IngestReport, SessionError> {
        self.index = None;
        if uploads.is_empty() {
            debug!("empty upload batch; nothing to index");
            return Ok(IngestReport::default());
        }

        let mut report = IngestReport::default();
        let mut segments = Vec::new();
        for upload in &uploads {
            match load_upload(upload) {
                Ok(loaded) => {
                    report.accepted.push(upload.name.clone());
                    segments.extend(loaded);
                }
                Err(e) => {
                    warn!(upload = %upload.name, error = %e, "skipping upload");
                    report.rejected.push(RejectedUpload {
                        name: upload.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let chunks = chunk_segments(&segments, &self.options.chunking);
        report.segments = segments.len();
        report.chunks = chunks.len();

        let index =
            VectorIndex::build_batched(chunks, self.embedder.as_ref(), self.options.batch_size).await?;
        self.index = Some(index);

        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            segments = report.segments,
            chunks = report.chunks,
            "upload batch indexed"
        );
        Ok(report)
    }

    /// Answer a question over the current batch. Returns `Ok(None)` when
    /// nothing has been ingested.
    pub async fn ask(&self, query: &Query) -> Result<Option<Answer>, SessionError> {
        let Some(index) = &self.index else {
            debug!("question asked before any upload; ignoring");
            return Ok(None);
        };

        let retrieved = self.retriever.retrieve(index, &query.question).await?;
        let prompt = query.language.apply(&query.question);
        let text = self.synthesizer.synthesize(&prompt, &retrieved.chunks()).await?;

        Ok(Some(Answer {
            text,
            language: query.language,
            retrieved,
        }))
    }
}
