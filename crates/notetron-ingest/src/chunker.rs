// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-bounded recursive text splitting.
//!
//! Splits on the coarsest separator that occurs in the text (blank
//! line, newline, space, then single characters) and greedily merges
//! the pieces back up to the chunk size. When a chunk closes, its tail
//! is retained up to the overlap budget and becomes the head of the
//! next chunk, so consecutive chunks of one page share context.

use std::collections::VecDeque;

/// Separators from coarsest to finest. The empty string splits into
/// single characters and always applies.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A recursive character splitter with a fixed size and overlap.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Creates a splitter. Sizes are measured in characters.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Splits `text` into chunks of at most `chunk_size` characters.
    /// Whitespace-only chunks are dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = *separators.last().unwrap_or(&"");
        let mut rest: &[&str] = &[];
        for (index, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() || text.contains(candidate) {
                separator = candidate;
                rest = &separators[index + 1..];
                break;
            }
        }

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator).map(str::to_string).collect()
        };

        let mut chunks = Vec::new();
        let mut mergeable: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) <= self.chunk_size {
                mergeable.push(piece);
                continue;
            }
            if !mergeable.is_empty() {
                chunks.extend(self.merge(&mergeable, separator));
                mergeable.clear();
            }
            if rest.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, rest));
            }
        }
        if !mergeable.is_empty() {
            chunks.extend(self.merge(&mergeable, separator));
        }
        chunks
    }

    /// Greedily joins pieces up to the chunk size, carrying an overlap
    /// tail from one chunk into the next.
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = char_len(piece);
            let join_len = if current.is_empty() { 0 } else { separator_len };

            if total + piece_len + join_len > self.chunk_size && !current.is_empty() {
                if let Some(chunk) = join_pieces(&current, separator) {
                    chunks.push(chunk);
                }
                // Shed from the front until the retained tail fits the
                // overlap budget and leaves room for the next piece.
                while total > self.chunk_overlap
                    || (total > 0
                        && total
                            + piece_len
                            + if current.is_empty() { 0 } else { separator_len }
                            > self.chunk_size)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(first)
                        + if current.is_empty() { 0 } else { separator_len };
                }
            }

            total += piece_len + if current.is_empty() { 0 } else { separator_len };
            current.push_back(piece);
        }

        if let Some(chunk) = join_pieces(&current, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join_pieces(pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = pieces
        .iter()
        .copied()
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
