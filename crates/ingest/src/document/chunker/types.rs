//! Chunk configuration.

use docqa_core::config::RetrievalConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChunkConfigError {
    #[error("chunk size must be positive")]
    ZeroSize,
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Configuration for the chunking engine. Lengths are in characters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 500).
    pub chunk_size: usize,
    /// Characters carried over from one chunk into the next (default: 100).
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkConfigError> {
        if chunk_size == 0 {
            return Err(ChunkConfigError::ZeroSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(ChunkConfigError::OverlapTooLarge {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }
}

impl TryFrom<&RetrievalConfig> for ChunkConfig {
    type Error = ChunkConfigError;

    fn try_from(config: &RetrievalConfig) -> Result<Self, Self::Error> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }
}
