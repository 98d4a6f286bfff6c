// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedder producing deterministic vectors.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notetron_core::{Embedder, NotetronError};

/// A mock embedder that derives a small vector from each text.
///
/// Vectors are deterministic per input so tests can correlate queries
/// with index entries. Every batch is captured; a specific call can be
/// scripted to fail for partial-failure tests.
pub struct MockEmbedder {
    dimension: usize,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    fail_on_call: Arc<Mutex<Option<usize>>>,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            batches: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the n-th call to `embed` (1-based) return an error.
    pub async fn fail_on_call(&self, n: usize) {
        *self.fail_on_call.lock().await = Some(n);
    }

    /// Get all batches that were passed to `embed`, including the
    /// failed one.
    pub async fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().await.clone()
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = text
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        (0..self.dimension)
            .map(|i| (seed.wrapping_add(i as u32) % 1000) as f32 / 1000.0)
            .collect()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NotetronError> {
        let mut batches = self.batches.lock().await;
        batches.push(texts.to_vec());
        let call = batches.len();
        drop(batches);

        if *self.fail_on_call.lock().await == Some(call) {
            return Err(NotetronError::Provider {
                message: "mock embedding failure".into(),
                source: None,
            });
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
