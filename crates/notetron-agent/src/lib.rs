// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request processing for the Notetron answering service.
//!
//! Every inbound request flows through the [`IdempotencyGate`], which
//! claims the request identifier and dispatches it at most once:
//! - `Version` requests answer with the deployment version string
//! - `Answer` requests run the [`AnswerComposer`] pipeline: short-term
//!   history, similarity retrieval, template compilation, temperature-0
//!   completion, and the question write-back into the vector index
//!
//! All external collaborators arrive as injected trait handles from
//! `notetron-core`; this crate holds no client code of its own.

pub mod composer;
pub mod gate;
pub mod retriever;

pub use composer::{AnswerComposer, ComposerSettings, HISTORY_LIMIT};
pub use gate::IdempotencyGate;
pub use retriever::{Retriever, RETRIEVAL_LIMIT};
