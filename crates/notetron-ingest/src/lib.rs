// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document ingestion for Notetron.
//!
//! Turns uploaded PDFs into embedded, permission-scoped chunks:
//! layout-aware extraction, per-page recursive chunking with overlap,
//! and batched writes to the vector store.

pub mod chunker;
pub mod extract;
pub mod pipeline;

#[cfg(test)]
mod testpdf;

pub use chunker::TextSplitter;
pub use extract::{extract_pdf, ExtractedDocument, PAGE_SENTINEL};
pub use pipeline::{DocumentIngestionPipeline, CHUNK_OVERLAP, CHUNK_SIZE, EMBED_BATCH_SIZE};
