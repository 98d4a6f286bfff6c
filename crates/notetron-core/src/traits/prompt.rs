// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt-template store trait.

use async_trait::async_trait;

use crate::error::NotetronError;
use crate::types::PromptTemplate;

/// Handle to the external versioned template store.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Fetches the current production version of the named template.
    async fn fetch(&self, name: &str) -> Result<PromptTemplate, NotetronError>;
}
