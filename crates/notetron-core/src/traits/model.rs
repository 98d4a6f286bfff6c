// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model trait for the completion step.

use async_trait::async_trait;

use crate::error::NotetronError;

/// Handle to the language model that produces answers.
///
/// Completions run at temperature 0 so the output is deterministic
/// given identical context.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends a composed prompt and returns the plain-text completion.
    async fn complete(&self, prompt: &str) -> Result<String, NotetronError>;
}
