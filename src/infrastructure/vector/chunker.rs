//! Text chunking
//!
//! Splits documents into overlapping, boundary-aware character windows.
//! Sizes and offsets are counted in characters (Unicode scalar values), so a
//! window never splits a multi-byte character.

use crate::domain::errors::RagResult;
use crate::domain::models::{Chunk, ChunkingConfig, Metadata};

/// Break points tried in priority order; the first one present in a window wins.
const BOUNDARIES: [&str; 5] = [". ", "! ", "? ", "\n\n", "\n"];

/// Boundary-aware text chunker
///
/// For each window of `chunk_size` characters that does not reach the end of
/// the text, the window is shortened to end just after the last occurrence of
/// the highest-priority separator it contains. The next window starts
/// `chunk_overlap` characters before the previous end.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker with the default 500/50 configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunker with a custom configuration
    pub fn with_config(config: ChunkingConfig) -> RagResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into chunks carrying `metadata` plus their `chunk_index`.
    ///
    /// Empty and whitespace-only input yields no chunks.
    pub fn chunk(&self, text: &str, metadata: &Metadata) -> Vec<Chunk> {
        let offsets = char_offsets(text);
        let mut chunks = Vec::new();

        for (start, end) in window_spans(text, &offsets, &self.config) {
            let piece = text[offsets[start]..offsets[end]].trim();
            if !piece.is_empty() {
                chunks.push(Chunk::new(piece, chunks.len(), metadata));
            }
        }

        chunks
    }
}

/// Split `text` with explicit sizes.
///
/// Fails with `InvalidInput` unless `chunk_size > chunk_overlap`.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    metadata: &Metadata,
) -> RagResult<Vec<Chunk>> {
    let chunker = Chunker::with_config(ChunkingConfig::new(chunk_size, chunk_overlap))?;
    Ok(chunker.chunk(text, metadata))
}

/// Byte offset of every character boundary, plus `text.len()` as the last entry.
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Untrimmed `[start, end)` windows in character positions.
fn window_spans(text: &str, offsets: &[usize], config: &ChunkingConfig) -> Vec<(usize, usize)> {
    let len = offsets.len() - 1;
    let mut spans = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + config.chunk_size).min(len);

        if end < len {
            let window = &text[offsets[start]..offsets[end]];
            if let Some(cut) = boundary_cut(window, config.chunk_overlap) {
                end = start + cut;
            }
        }

        spans.push((start, end));

        if end >= len {
            break;
        }

        start = (start + 1).max(end.saturating_sub(config.chunk_overlap));
    }

    spans
}

/// Length in characters of the window prefix ending just after the preferred break.
///
/// A break inside the first `overlap` characters would send the next window
/// back to where this one started, so it does not count.
fn boundary_cut(window: &str, overlap: usize) -> Option<usize> {
    BOUNDARIES.iter().find_map(|sep| {
        window
            .rfind(sep)
            .map(|pos| window[..pos + sep.len()].chars().count())
            .filter(|&cut| cut > overlap)
    })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn text_strategy() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Zé0-9 .,!?\n]{0,600}").expect("Valid regex")
    }

    fn sizes_strategy() -> impl Strategy<Value = (usize, usize)> {
        (1usize..120).prop_flat_map(|size| (Just(size), 0..size))
    }

    proptest! {
        /// Windows start at 0, advance strictly, leave no gaps and reach the end
        #[test]
        fn proptest_windows_cover_text(text in text_strategy(), (size, overlap) in sizes_strategy()) {
            let config = ChunkingConfig::new(size, overlap);
            let offsets = char_offsets(&text);
            let len = offsets.len() - 1;
            let spans = window_spans(&text, &offsets, &config);

            if len == 0 {
                prop_assert!(spans.is_empty());
            } else {
                prop_assert_eq!(spans[0].0, 0);
                prop_assert_eq!(spans.last().map(|s| s.1), Some(len));
                for pair in spans.windows(2) {
                    prop_assert!(pair[1].0 > pair[0].0, "start must strictly increase");
                    prop_assert!(pair[1].0 <= pair[0].1, "gap between windows");
                }
                for (start, end) in &spans {
                    prop_assert!(end > start);
                    prop_assert!(end - start <= size);
                }
            }
        }

        /// Chunk indices are exactly 0..n and every chunk is trimmed and non-empty
        #[test]
        fn proptest_indices_contiguous(text in text_strategy(), (size, overlap) in sizes_strategy()) {
            let chunks = chunk_text(&text, size, overlap, &Metadata::new()).unwrap();

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.chunk_index, i);
                prop_assert!(!chunk.text.is_empty());
                prop_assert_eq!(chunk.text.trim(), chunk.text.as_str());
                prop_assert!(text.contains(&chunk.text));
            }

            if text.trim().is_empty() {
                prop_assert!(chunks.is_empty());
            } else {
                prop_assert!(!chunks.is_empty());
            }
        }
    }
}
