// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Notetron answering service.

use thiserror::Error;

/// The primary error type used across all Notetron service traits and core operations.
#[derive(Debug, Error)]
pub enum NotetronError {
    /// Configuration errors (missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// History/idempotency store errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Language-model or embedding API errors (request failure, bad response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector-index errors (upsert or search failure).
    #[error("vector store error: {message}")]
    VectorStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Prompt-template store errors (fetch failure, unknown template).
    #[error("prompt store error: {message}")]
    PromptStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Trace-sink errors. Call sites treat these as best-effort and
    /// never abort the traced operation.
    #[error("trace error: {message}")]
    Trace {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Some embedding batches failed after earlier ones were written.
    /// Written batches are never rolled back.
    #[error("partial ingestion: {embedded} of {produced} chunks embedded: {message}")]
    PartialIngestion {
        embedded: usize,
        produced: usize,
        message: String,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotetronError {
    /// Whether the failed operation is safe to run again on a redelivery.
    ///
    /// Transient failures must not mark an idempotency record Completed;
    /// the gate reverts the record so the event stays retryable.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NotetronError::Storage { .. }
                | NotetronError::Provider { .. }
                | NotetronError::VectorStore { .. }
                | NotetronError::PromptStore { .. }
                | NotetronError::Trace { .. }
                | NotetronError::PartialIngestion { .. }
        )
    }
}
