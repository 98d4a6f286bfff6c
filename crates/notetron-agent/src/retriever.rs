// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity retrieval over the vector index.

use std::sync::Arc;

use notetron_core::{Embedder, NotetronError, ScoredChunk, VectorStore};
use tracing::debug;

/// Number of chunks handed to the prompt per question.
pub const RETRIEVAL_LIMIT: usize = 4;

/// Embeds a query and searches the vector index under the caller's
/// visibility filter.
///
/// Queries go through the same embedding model used at ingestion time,
/// so query vectors and index vectors live in the same space.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Returns up to [`RETRIEVAL_LIMIT`] chunks visible to `owner_key`,
    /// ranked by similarity to `query`. The store applies the visibility
    /// filter; nothing outside `{owner_key, shared}` comes back.
    pub async fn search(
        &self,
        query: &str,
        owner_key: &str,
    ) -> Result<Vec<ScoredChunk>, NotetronError> {
        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| NotetronError::Provider {
                message: "embedding response was empty".to_string(),
                source: None,
            })?;
        let hits = self
            .store
            .search(&vector, owner_key, RETRIEVAL_LIMIT)
            .await?;
        debug!(owner_key, hits = hits.len(), "retrieval complete");
        Ok(hits)
    }
}
