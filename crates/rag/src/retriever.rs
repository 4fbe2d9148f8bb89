use std::sync::Arc;

use docqa_core::Chunk;
use docqa_ingest::Embedder;
use serde::Serialize;
use tracing::debug;

use crate::index::{ScoredChunk, SearchError, VectorIndex};

/// Chunks retrieved for one question, most similar first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievedSet {
    pub items: Vec<ScoredChunk>,
}

impl RetrievedSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn chunks(&self) -> Vec<Chunk> {
        self.items.iter().map(|s| s.chunk.clone()).collect()
    }
}

/// Top-k similarity retrieval over a [`VectorIndex`].
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub const DEFAULT_TOP_K: usize = 3;

    pub fn new(embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self { embedder, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub async fn retrieve(&self, index: &VectorIndex, query: &str) -> Result<RetrievedSet, SearchError> {
        let items = index.search(query, self.top_k, self.embedder.as_ref()).await?;
        debug!(
            top_k = self.top_k,
            hits = items.len(),
            best = items.first().map(|s| s.score),
            "retrieved chunks"
        );
        Ok(RetrievedSet { items })
    }
}
