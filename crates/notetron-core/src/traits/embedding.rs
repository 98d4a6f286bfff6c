// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding trait for vector generation.

use async_trait::async_trait;

use crate::error::NotetronError;

/// Handle to the embedding model shared by ingestion and retrieval.
///
/// Both sides must embed with the same model, otherwise query vectors
/// and index vectors live in different spaces.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, returning one vector per input in
    /// the input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NotetronError>;
}
