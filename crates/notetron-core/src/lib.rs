// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Notetron answering service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Notetron workspace. Concrete service
//! clients implement traits defined here and are injected as handles.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::NotetronError;
pub use types::{
    ChunkKind, ConversationTurn, DocumentChunk, EmbeddedChunk, EventId, IdempotencyState,
    IngestionOutcome, IngestionSummary, MessageEvent, PromptTemplate, Request, ScopeKind,
    ScoredChunk, TraceEvent, SHARED_OWNER,
};

// Re-export all service traits at crate root.
pub use traits::{Embedder, LanguageModel, PromptStore, TraceSink, VectorStore};
