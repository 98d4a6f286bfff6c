// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock prompt store serving a fixed template.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notetron_core::{NotetronError, PromptStore, PromptTemplate};

/// A mock prompt store that returns one configurable template.
///
/// The default template exposes every slot the composer fills, so
/// assertions on the compiled prompt can see exactly what went in.
pub struct MockPromptStore {
    template: Arc<Mutex<PromptTemplate>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MockPromptStore {
    /// Create a mock store serving the default all-slots template.
    pub fn new() -> Self {
        Self::with_template(PromptTemplate {
            name: "notetron".to_string(),
            version: 1,
            template: "context={{context}}\nhistory={{history}}\ndate={{date}}\n\
                       version={{version}}\nuser={{user}}\nquestion={{question}}"
                .to_string(),
        })
    }

    /// Create a mock store serving the given template.
    pub fn with_template(template: PromptTemplate) -> Self {
        Self {
            template: Arc::new(Mutex::new(template)),
            fetches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all template names that were fetched.
    pub async fn fetched_names(&self) -> Vec<String> {
        self.fetches.lock().await.clone()
    }
}

impl Default for MockPromptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptStore for MockPromptStore {
    async fn fetch(&self, name: &str) -> Result<PromptTemplate, NotetronError> {
        self.fetches.lock().await.push(name.to_string());
        Ok(self.template.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_template_and_records_fetches() {
        let store = MockPromptStore::new();
        let template = store.fetch("notetron").await.unwrap();
        assert_eq!(template.version, 1);
        assert!(template.template.contains("{{question}}"));
        assert_eq!(store.fetched_names().await, vec!["notetron".to_string()]);
    }
}
