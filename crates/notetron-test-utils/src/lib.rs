// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Notetron integration tests.
//!
//! Provides mock service handles for fast, deterministic, CI-runnable
//! tests without external services.
//!
//! # Components
//!
//! - [`MockModel`] - Mock language model with pre-configured replies
//! - [`MockEmbedder`] - Deterministic embedder with scripted failures
//! - [`MockVectorStore`] - Vector store with captured upserts and scripted search results
//! - [`MockPromptStore`] - Prompt store serving a fixed template
//! - [`MockTraceSink`] - Trace sink capturing recorded events

pub mod mock_embedder;
pub mod mock_model;
pub mod mock_prompt;
pub mod mock_trace;
pub mod mock_vector;

pub use mock_embedder::MockEmbedder;
pub use mock_model::MockModel;
pub use mock_prompt::MockPromptStore;
pub use mock_trace::MockTraceSink;
pub use mock_vector::{MockVectorStore, SearchCall};
