// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service trait definitions for the external collaborators.
//!
//! Every component receives these as explicitly constructed handles;
//! there are no ambient singletons. All traits use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod embedding;
pub mod model;
pub mod prompt;
pub mod trace;
pub mod vector;

// Re-export all traits at the traits module level for convenience.
pub use embedding::Embedder;
pub use model::LanguageModel;
pub use prompt::PromptStore;
pub use trace::TraceSink;
pub use vector::VectorStore;
