// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end document ingestion.
//!
//! Extracts a PDF, chunks it page by page, stamps visibility and
//! provenance metadata, and writes embeddings in bounded batches.
//! Re-ingesting the same document produces the same point ids (content
//! hash keyed), so the index converges instead of accumulating
//! duplicates; uids stay fresh per write.

use std::sync::Arc;

use chrono::Utc;
use notetron_core::{
    ChunkKind, DocumentChunk, EmbeddedChunk, Embedder, IngestionOutcome, IngestionSummary,
    NotetronError, VectorStore, SHARED_OWNER,
};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chunker::TextSplitter;
use crate::extract::{self, ExtractedDocument, PAGE_SENTINEL};

/// Target chunk size in characters.
pub const CHUNK_SIZE: usize = 1000;
/// Characters repeated between consecutive chunks of one page.
pub const CHUNK_OVERLAP: usize = 200;
/// Maximum chunks per embedding-store write.
pub const EMBED_BATCH_SIZE: usize = 100;

/// Marks a chunk that opens with text repeated from its predecessor.
const CONTINUATION_MARKER: &str = "(cont'd) ";

/// Converts uploaded documents into embedded, retrievable chunks.
pub struct DocumentIngestionPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    phase: i64,
    splitter: TextSplitter,
}

impl DocumentIngestionPipeline {
    /// Creates a pipeline writing chunks stamped with `phase`.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, phase: i64) -> Self {
        Self {
            embedder,
            store,
            phase,
            splitter: TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP),
        }
    }

    /// Ingests one uploaded document.
    ///
    /// Documents whose extension is not PDF are skipped, not failed:
    /// uploads of other types are expected traffic.
    pub async fn ingest(
        &self,
        bytes: &[u8],
        source_name: &str,
        extension: &str,
    ) -> Result<IngestionOutcome, NotetronError> {
        if !extension.eq_ignore_ascii_case("pdf") {
            debug!(source = source_name, extension, "unsupported extension, skipping ingestion");
            return Ok(IngestionOutcome::Skipped);
        }

        let extracted = extract::extract_pdf(bytes)?;
        debug!(source = source_name, pages = extracted.pages, "text extracted");

        let chunks = self.chunk_document(&extracted, source_name);
        let produced = chunks.len();
        let embedded = self.embed_chunks(chunks).await?;

        let summary = IngestionSummary {
            pages: extracted.pages,
            chunks: produced,
            embedded,
        };
        info!(
            source = source_name,
            pages = summary.pages,
            chunks = summary.chunks,
            embedded = summary.embedded,
            "document ingested"
        );
        Ok(IngestionOutcome::Completed(summary))
    }

    /// Splits the extracted text per page and stamps chunk metadata.
    fn chunk_document(
        &self,
        extracted: &ExtractedDocument,
        source_name: &str,
    ) -> Vec<DocumentChunk> {
        let header = format!("DOCUMENT NAME: {source_name} \n\n-- -\n\n");
        let now = Utc::now().timestamp();

        let mut chunks = Vec::new();
        for page in extracted.text.split(PAGE_SENTINEL) {
            for (index, piece) in self.splitter.split(page).into_iter().enumerate() {
                let marker = if index == 0 { "" } else { CONTINUATION_MARKER };
                let digest = chunk_digest(&piece, source_name);
                chunks.push(DocumentChunk {
                    content: format!("{header}{marker}{piece}"),
                    uid: Uuid::new_v4().to_string(),
                    phase: self.phase,
                    kind: ChunkKind::ExternalDocument,
                    timestamp: now,
                    owner_id: SHARED_OWNER.to_string(),
                    source_document: Some(source_name.to_string()),
                    source_metadata: extracted.metadata.clone(),
                    content_hash: Some(hex::encode(digest)),
                });
            }
        }
        chunks
    }

    /// Embeds and writes chunks in batches of [`EMBED_BATCH_SIZE`].
    ///
    /// Batches already written stay written; a failing batch reports how
    /// far ingestion got.
    pub(crate) async fn embed_chunks(
        &self,
        chunks: Vec<DocumentChunk>,
    ) -> Result<usize, NotetronError> {
        let produced = chunks.len();
        let mut embedded = 0usize;

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = match self.embedder.embed(&texts).await {
                Ok(vectors) => vectors,
                Err(e) => {
                    return Err(NotetronError::PartialIngestion {
                        embedded,
                        produced,
                        message: e.to_string(),
                    });
                }
            };

            let points: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(chunk, vector)| EmbeddedChunk {
                    point_id: point_id_for(&chunk),
                    vector,
                    chunk,
                })
                .collect();

            if let Err(e) = self.store.upsert(&points).await {
                return Err(NotetronError::PartialIngestion {
                    embedded,
                    produced,
                    message: e.to_string(),
                });
            }
            embedded += batch.len();
        }
        Ok(embedded)
    }
}

/// Derives the vector-index point id. Content-hashed chunks map to a
/// stable UUID so re-ingestion overwrites instead of duplicating.
fn point_id_for(chunk: &DocumentChunk) -> String {
    let Some(hash) = &chunk.content_hash else {
        return chunk.uid.clone();
    };
    match hex::decode(hash) {
        Ok(bytes) if bytes.len() >= 16 => {
            let mut raw = [0u8; 16];
            raw.copy_from_slice(&bytes[..16]);
            Uuid::from_bytes(raw).to_string()
        }
        _ => chunk.uid.clone(),
    }
}

fn chunk_digest(content: &str, source_name: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(source_name.as_bytes());
    hasher.finalize().into()
}
