// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock vector store with captured upserts and scripted search results.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notetron_core::{EmbeddedChunk, NotetronError, ScoredChunk, VectorStore};

/// A recorded `search` invocation.
#[derive(Debug, Clone)]
pub struct SearchCall {
    pub vector: Vec<f32>,
    pub owner_key: String,
    pub limit: usize,
}

/// A mock vector store for testing.
///
/// Provides two queues:
/// - **results**: scripted via `push_results()`, popped by `search()`
///   (empty result set when exhausted)
/// - **upserts**: batches passed to `upsert()` are captured in order
///   and retrievable via `upserted_batches()`
pub struct MockVectorStore {
    results: Arc<Mutex<VecDeque<Vec<ScoredChunk>>>>,
    upserts: Arc<Mutex<Vec<Vec<EmbeddedChunk>>>>,
    upsert_calls: Arc<Mutex<usize>>,
    searches: Arc<Mutex<Vec<SearchCall>>>,
    fail_on_upsert: Arc<Mutex<Option<usize>>>,
}

impl MockVectorStore {
    /// Create a new mock vector store with empty queues.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            upserts: Arc::new(Mutex::new(Vec::new())),
            upsert_calls: Arc::new(Mutex::new(0)),
            searches: Arc::new(Mutex::new(Vec::new())),
            fail_on_upsert: Arc::new(Mutex::new(None)),
        }
    }

    /// Script the result set for the next `search` call.
    pub async fn push_results(&self, results: Vec<ScoredChunk>) {
        self.results.lock().await.push_back(results);
    }

    /// Make the n-th call to `upsert` (1-based) return an error.
    pub async fn fail_on_upsert(&self, n: usize) {
        *self.fail_on_upsert.lock().await = Some(n);
    }

    /// Get all batches that were successfully upserted, in call order.
    pub async fn upserted_batches(&self) -> Vec<Vec<EmbeddedChunk>> {
        self.upserts.lock().await.clone()
    }

    /// Get all upserted points flattened across batches.
    pub async fn upserted_points(&self) -> Vec<EmbeddedChunk> {
        self.upserts.lock().await.iter().flatten().cloned().collect()
    }

    /// Get all recorded `search` invocations.
    pub async fn search_calls(&self) -> Vec<SearchCall> {
        self.searches.lock().await.clone()
    }
}

impl Default for MockVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn upsert(&self, points: &[EmbeddedChunk]) -> Result<(), NotetronError> {
        let mut calls = self.upsert_calls.lock().await;
        *calls += 1;
        let call = *calls;
        drop(calls);

        if *self.fail_on_upsert.lock().await == Some(call) {
            return Err(NotetronError::VectorStore {
                message: "mock upsert failure".into(),
                source: None,
            });
        }
        self.upserts.lock().await.push(points.to_vec());
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        owner_key: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, NotetronError> {
        self.searches.lock().await.push(SearchCall {
            vector: vector.to_vec(),
            owner_key: owner_key.to_string(),
            limit,
        });
        Ok(self.results.lock().await.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetron_core::{ChunkKind, DocumentChunk};

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk {
            content: content.to_string(),
            uid: "u1".to_string(),
            phase: 2,
            kind: ChunkKind::Message,
            timestamp: 0,
            owner_id: "U1".to_string(),
            source_document: None,
            source_metadata: None,
            content_hash: None,
        }
    }

    #[tokio::test]
    async fn captures_upserts_and_searches() {
        let store = MockVectorStore::new();
        let point = EmbeddedChunk {
            point_id: "p1".to_string(),
            vector: vec![0.1, 0.2],
            chunk: chunk("hello"),
        };
        store.upsert(&[point.clone()]).await.unwrap();

        let results = store.search(&[0.1, 0.2], "U1", 4).await.unwrap();
        assert!(results.is_empty());

        assert_eq!(store.upserted_batches().await.len(), 1);
        let calls = store.search_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].owner_key, "U1");
        assert_eq!(calls[0].limit, 4);
    }

    #[tokio::test]
    async fn scripted_results_and_failure() {
        let store = MockVectorStore::new();
        store
            .push_results(vec![ScoredChunk {
                chunk: chunk("found"),
                score: 0.9,
            }])
            .await;
        let results = store.search(&[0.0], "U1", 4).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "found");

        store.fail_on_upsert(1).await;
        let point = EmbeddedChunk {
            point_id: "p1".to_string(),
            vector: vec![0.1],
            chunk: chunk("x"),
        };
        assert!(store.upsert(&[point]).await.is_err());
        assert!(store.upserted_batches().await.is_empty());
    }
}
