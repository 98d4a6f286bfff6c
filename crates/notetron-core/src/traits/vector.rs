// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector-index trait for chunk storage and similarity search.

use async_trait::async_trait;

use crate::error::NotetronError;
use crate::types::{EmbeddedChunk, ScoredChunk};

/// Handle to the vector index holding document and message chunks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes one batch of embedded chunks as a single call, preserving
    /// the given order within the batch.
    async fn upsert(&self, points: &[EmbeddedChunk]) -> Result<(), NotetronError>;

    /// Returns up to `limit` chunks nearest to `vector`, restricted to
    /// chunks whose owner is `owner_key` or the shared owner. Chunks
    /// outside that visibility filter are never returned.
    async fn search(
        &self,
        vector: &[f32],
        owner_key: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, NotetronError>;
}
