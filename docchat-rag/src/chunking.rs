//! Document chunking.
//!
//! [`BoundaryChunker`] produces overlapping character windows, pulling each cut
//! back to the nearest paragraph, line or word boundary when one is close to
//! the raw cut point. Consecutive chunks of a document always share exactly
//! `chunk_overlap` characters, so the chunks of a document cover its text with
//! no gaps.

use crate::config::validate_chunk_params;
use crate::document::{Chunk, Document};
use crate::error::Result;

/// A strategy for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no non-whitespace text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into windows of at most `chunk_size` characters with
/// `chunk_overlap` characters shared between neighbours.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk inherits
/// the parent document's metadata plus `chunk_index` and `start_index`.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(1000, 150)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`](crate::RagError::ConfigError) unless
    /// `0 < chunk_size` and `chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_chunk_params(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// How far before a raw cut point a boundary may be searched for.
    fn lookback(&self) -> usize {
        (self.chunk_size / 5).max(1)
    }

    /// Split text into `(start_char, text)` windows.
    fn split(&self, text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut windows = Vec::new();
        let mut start = 0;

        while start < len {
            let raw_end = (start + self.chunk_size).min(len);
            let end = if raw_end == len {
                len
            } else {
                self.find_break(&chars, start, raw_end).unwrap_or(raw_end)
            };

            let piece: String = chars[start..end].iter().collect();
            if !piece.trim().is_empty() {
                windows.push((start, piece));
            }

            if end == len {
                break;
            }
            // end > start + overlap, so this always advances
            start = end - self.chunk_overlap;
        }

        windows
    }

    /// Find a cut position in `(start + overlap, raw_end]` that falls right
    /// after a paragraph break, a newline, or any whitespace, in that order.
    fn find_break(&self, chars: &[char], start: usize, raw_end: usize) -> Option<usize> {
        let floor =
            raw_end.saturating_sub(self.lookback()).max(start + self.chunk_overlap + 1);
        if floor > raw_end {
            return None;
        }

        let candidates = || (floor..=raw_end).rev();
        let paragraph = |p: usize| p >= 2 && chars[p - 2] == '\n' && chars[p - 1] == '\n';

        candidates()
            .find(|&p| paragraph(p))
            .or_else(|| candidates().find(|&p| chars[p - 1] == '\n'))
            .or_else(|| candidates().find(|&p| chars[p - 1].is_whitespace()))
    }
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        self.split(&document.text)
            .into_iter()
            .enumerate()
            .map(|(i, (start, text))| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                metadata.insert("start_index".to_string(), start.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text,
                    index: i,
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

/// Chunk every document in order with a [`BoundaryChunker`].
///
/// Output preserves document order, then chunk order within a document.
pub fn chunk_documents(
    documents: &[Document],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>> {
    let chunker = BoundaryChunker::new(chunk_size, chunk_overlap)?;
    Ok(documents.iter().flat_map(|document| chunker.chunk(document)).collect())
}
