// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for deterministic testing.
//!
//! `MockModel` implements `LanguageModel` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notetron_core::{LanguageModel, NotetronError};

/// A mock language model that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock completion" text is returned. Every prompt received
/// is captured for assertion.
pub struct MockModel {
    replies: Arc<Mutex<VecDeque<Result<String, NotetronError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    /// Create a new mock model with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock model pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        let queue: VecDeque<_> = replies.into_iter().map(Ok).collect();
        Self {
            replies: Arc::new(Mutex::new(queue)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, text: String) {
        self.replies.lock().await.push_back(Ok(text));
    }

    /// Add a failure to the end of the queue. The corresponding call
    /// to `complete` returns this error.
    pub async fn add_failure(&self, error: NotetronError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// Get all prompts that were passed to `complete`.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Get the count of completion calls.
    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String, NotetronError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock completion".to_string()))
    }
}
