//! Segment → chunk windows.

use docqa_core::{Chunk, Segment};
use tracing::debug;

use super::helpers::{char_len, split_recursive, trim_range, SEPARATORS};
use super::types::ChunkConfig;

/// Chunk every segment and number the chunks across the whole batch.
pub fn chunk_segments(segments: &[Segment], config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = segments
        .iter()
        .flat_map(|segment| chunk_segment(segment, config))
        .collect();

    // Assign global indices.
    for (i, c) in chunks.iter_mut().enumerate() {
        c.index = i;
    }
    debug!(
        segments = segments.len(),
        chunks = chunks.len(),
        chunk_size = config.chunk_size,
        overlap = config.chunk_overlap,
        "chunked batch"
    );
    chunks
}

/// Chunk a single segment. Indices restart at 0.
pub fn chunk_segment(segment: &Segment, config: &ChunkConfig) -> Vec<Chunk> {
    let text = segment.text.as_str();
    let whole = trim_range(text, 0..text.len());
    if whole.is_empty() {
        return Vec::new();
    }

    let windows = if char_len(&text[whole.clone()]) <= config.chunk_size {
        vec![whole]
    } else {
        split_recursive(text, whole, SEPARATORS, config)
    };

    // Window starts are non-decreasing, so offsets can be counted incrementally.
    let mut counted_bytes = 0usize;
    let mut counted_chars = 0usize;

    windows
        .into_iter()
        .map(|range| trim_range(text, range))
        .filter(|range| !range.is_empty())
        .enumerate()
        .map(|(index, range)| {
            counted_chars += char_len(&text[counted_bytes..range.start]);
            counted_bytes = range.start;
            Chunk {
                index,
                content: text[range].to_string(),
                source: segment.source.clone(),
                page: segment.page,
                char_offset: counted_chars,
            }
        })
        .collect()
}
