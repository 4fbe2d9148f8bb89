//! Character-window chunking engine.
//!
//! Splits loaded segments into overlapping chunks suitable for embedding. Each
//! segment is split on the coarsest boundary that is present (paragraph, line,
//! sentence, word) and falls back to hard character cuts only when a piece has
//! no boundary left. Chunks never span two segments.

mod helpers;
mod segments;
mod types;

pub use segments::{chunk_segment, chunk_segments};
pub use types::{ChunkConfig, ChunkConfigError};
