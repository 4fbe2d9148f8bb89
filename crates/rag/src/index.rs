//! In-memory vector index over one upload batch.
//!
//! Built once from a batch of chunks and never mutated afterwards; a new batch
//! means a new index. Search is exact: the query is scored against every
//! stored vector with cosine similarity.

use docqa_core::Chunk;
use docqa_ingest::{Embedder, EmbeddingError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Chunks embedded per provider call when no batch size is configured.
pub const DEFAULT_BATCH_SIZE: usize = 64;

#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("embedding batch {batch} failed: {source}")]
    Embedding {
        batch: usize,
        #[source]
        source: EmbeddingError,
    },
    #[error("embedder returned {actual} vectors for {expected} chunks")]
    CountMismatch { expected: usize, actual: usize },
    #[error("chunk {index} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("query has {actual} dimensions, index has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// A chunk paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug)]
struct Entry {
    vector: Vec<f32>,
    chunk: Chunk,
}

#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<Entry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Embed `chunks` in batches of [`DEFAULT_BATCH_SIZE`] and index them.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn Embedder) -> Result<Self, IndexBuildError> {
        Self::build_batched(chunks, embedder, DEFAULT_BATCH_SIZE).await
    }

    /// Embed `chunks` in batches of `batch_size` and index them. Any failed
    /// batch or inconsistent vector fails the whole build.
    pub async fn build_batched(
        chunks: Vec<Chunk>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self, IndexBuildError> {
        let batch_size = batch_size.max(1);
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());

        for (batch, group) in chunks.chunks(batch_size).enumerate() {
            let texts: Vec<&str> = group.iter().map(|c| c.content.as_str()).collect();
            let embedded = embedder
                .embed_batch(&texts)
                .await
                .map_err(|source| IndexBuildError::Embedding { batch, source })?;
            if embedded.len() != texts.len() {
                return Err(IndexBuildError::CountMismatch {
                    expected: texts.len(),
                    actual: embedded.len(),
                });
            }
            vectors.extend(embedded);
            debug!(batch, embedded = vectors.len(), total = chunks.len(), "embedded batch");
        }

        let dimensions = vectors.first().map_or(0, Vec::len);
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimensions) {
            return Err(IndexBuildError::DimensionMismatch {
                index,
                expected: dimensions,
                actual: v.len(),
            });
        }

        let entries: Vec<Entry> = vectors
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| Entry { vector, chunk })
            .collect();
        info!(chunks = entries.len(), dimensions, "vector index built");
        Ok(Self { entries, dimensions })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector width; 0 for an empty index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Indexed chunks in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }

    /// Embed `query` and return the `k` most similar chunks. An empty index or
    /// `k == 0` returns nothing without calling the embedder.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredChunk>, SearchError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }
        let vector = embedder.embed(query).await?;
        if vector.len() != self.dimensions {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        Ok(self.search_vector(&vector, k))
    }

    /// Top `min(k, len)` chunks by descending cosine similarity. Equal scores
    /// keep insertion order.
    pub fn search_vector(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect()
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len().min(b.len());
    if dim == 0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for i in 0..dim {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom.is_nan() || denom <= f32::EPSILON {
        return 0.0;
    }

    let similarity = dot / denom;
    if similarity.is_nan() {
        // Non-finite components must never outrank real matches.
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chunks, FakeEmbedder};

    #[test]
    fn cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_orthogonal_and_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_similarity_of_nan_is_zero() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn nan_query_does_not_reorder_results() {
        let embedder = FakeEmbedder::keyword();
        let index = VectorIndex::build(chunks(&["cats purr", "dogs bark"]), &embedder)
            .await
            .unwrap();
        let hits = index.search_vector(&vec![f32::NAN; index.dimensions()], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.content, "cats purr");
        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let embedder = FakeEmbedder::keyword();
        let index = VectorIndex::build(
            chunks(&["cats purr", "dogs bark", "dogs and cats"]),
            &embedder,
        )
        .await
        .unwrap();

        let hits = index.search("dogs", 2, &embedder).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.content, "dogs bark");
        assert_eq!(hits[1].chunk.content, "dogs and cats");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let embedder = FakeEmbedder::constant(4);
        let index = VectorIndex::build(chunks(&["a", "b", "c", "d"]), &embedder)
            .await
            .unwrap();
        let order: Vec<usize> = index
            .search("anything", 4, &embedder)
            .await
            .unwrap()
            .iter()
            .map(|h| h.chunk.index)
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn k_larger_than_index_returns_everything() {
        let embedder = FakeEmbedder::keyword();
        let index = VectorIndex::build(chunks(&["one", "two"]), &embedder).await.unwrap();
        assert_eq!(index.search("one", 10, &embedder).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn k_zero_and_empty_index_return_nothing_without_embedding() {
        let embedder = FakeEmbedder::keyword();
        let empty = VectorIndex::build(Vec::new(), &embedder).await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.dimensions(), 0);
        assert!(empty.search("q", 3, &embedder).await.unwrap().is_empty());

        let index = VectorIndex::build(chunks(&["x"]), &embedder).await.unwrap();
        let calls_before = embedder.calls();
        assert!(index.search("x", 0, &embedder).await.unwrap().is_empty());
        assert_eq!(embedder.calls(), calls_before);
    }

    #[tokio::test]
    async fn embeds_in_batches() {
        let embedder = FakeEmbedder::keyword();
        let texts: Vec<String> = (0..10).map(|i| format!("chunk {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let index = VectorIndex::build_batched(chunks(&refs), &embedder, 4).await.unwrap();
        assert_eq!(index.len(), 10);
        assert_eq!(embedder.calls(), 3);
        let order: Vec<usize> = index.chunks().map(|c| c.index).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failed_batch_aborts_the_build() {
        let embedder = FakeEmbedder::keyword().failing_on_call(2);
        let texts: Vec<String> = (0..10).map(|i| format!("chunk {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let err = VectorIndex::build_batched(chunks(&refs), &embedder, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexBuildError::Embedding { batch: 1, .. }));
    }

    #[tokio::test]
    async fn inconsistent_dimensions_fail_the_build() {
        let embedder = FakeEmbedder::ragged();
        let err = VectorIndex::build(chunks(&["short", "a much longer text"]), &embedder)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexBuildError::DimensionMismatch { index: 1, .. }));
    }

    #[tokio::test]
    async fn query_dimension_mismatch_is_an_error() {
        let index = VectorIndex::build(chunks(&["abc"]), &FakeEmbedder::constant(4))
            .await
            .unwrap();
        let err = index
            .search("abc", 1, &FakeEmbedder::constant(3))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::DimensionMismatch { expected: 4, actual: 3 }));
    }
}
