//! Text splitting and merging utilities used by the chunker.
//!
//! Everything works on byte ranges into the segment text. Pieces produced by a
//! split are contiguous and cover the text exactly, so a merged window is again
//! a single contiguous range.

use std::collections::VecDeque;
use std::ops::Range;

use super::types::ChunkConfig;

/// Boundaries tried from coarsest to finest. Past the last one the text is cut
/// between characters.
pub(crate) const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// Length in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text[span]` after every occurrence of `sep`, keeping the separator at
/// the end of the piece it terminates.
pub(crate) fn split_after(text: &str, span: Range<usize>, sep: &str) -> Vec<Range<usize>> {
    let mut start = span.start;
    text[span.clone()]
        .split_inclusive(sep)
        .map(|piece| {
            let range = start..start + piece.len();
            start = range.end;
            range
        })
        .collect()
}

/// One range per character of `text[span]`.
pub(crate) fn split_chars(text: &str, span: Range<usize>) -> Vec<Range<usize>> {
    text[span.clone()]
        .char_indices()
        .map(|(i, c)| span.start + i..span.start + i + c.len_utf8())
        .collect()
}

/// Recursively split `text[span]` into windows of at most `chunk_size`
/// characters, preferring the coarsest separator present.
pub(crate) fn split_recursive(
    text: &str,
    span: Range<usize>,
    separators: &[&str],
    config: &ChunkConfig,
) -> Vec<Range<usize>> {
    let slice = &text[span.clone()];
    let (pieces, finer) = match separators.iter().position(|sep| slice.contains(sep)) {
        Some(i) => (split_after(text, span, separators[i]), &separators[i + 1..]),
        None => (split_chars(text, span), &separators[separators.len()..]),
    };

    let mut windows = Vec::new();
    let mut fitting: Vec<Range<usize>> = Vec::new();

    for piece in pieces {
        if char_len(&text[piece.clone()]) < config.chunk_size {
            fitting.push(piece);
            continue;
        }
        if !fitting.is_empty() {
            windows.extend(merge_pieces(text, &fitting, config));
            fitting.clear();
        }
        if text[piece.clone()].chars().nth(1).is_none() {
            // A single character cannot be split further.
            windows.push(piece);
        } else {
            windows.extend(split_recursive(text, piece, finer, config));
        }
    }
    if !fitting.is_empty() {
        windows.extend(merge_pieces(text, &fitting, config));
    }
    windows
}

/// Greedily pack pieces into windows of at most `chunk_size` characters. When a
/// window is emitted, its trailing pieces totalling at most `chunk_overlap`
/// characters start the next window.
pub(crate) fn merge_pieces(
    text: &str,
    pieces: &[Range<usize>],
    config: &ChunkConfig,
) -> Vec<Range<usize>> {
    let mut windows = Vec::new();
    let mut current: VecDeque<(Range<usize>, usize)> = VecDeque::new();
    let mut total = 0usize;

    for piece in pieces {
        let len = char_len(&text[piece.clone()]);
        if total + len > config.chunk_size && !current.is_empty() {
            windows.push(span_of(&current));
            while total > config.chunk_overlap || (total > 0 && total + len > config.chunk_size) {
                match current.pop_front() {
                    Some((_, dropped)) => total -= dropped,
                    None => break,
                }
            }
        }
        current.push_back((piece.clone(), len));
        total += len;
    }
    if !current.is_empty() {
        windows.push(span_of(&current));
    }
    windows
}

fn span_of(pieces: &VecDeque<(Range<usize>, usize)>) -> Range<usize> {
    match (pieces.front(), pieces.back()) {
        (Some((first, _)), Some((last, _))) => first.start..last.end,
        _ => 0..0,
    }
}

/// Shrink `range` so `text[range]` has no leading/trailing whitespace.
pub(crate) fn trim_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    start..end.max(start)
}
