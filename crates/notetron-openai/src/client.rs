// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completion and embedding APIs.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, and transient error retry. The same client serves
//! both the [`LanguageModel`] and [`Embedder`] handles so ingestion and
//! retrieval embed with the same model.

use std::time::Duration;

use async_trait::async_trait;
use notetron_config::OpenAiConfig;
use notetron_core::{Embedder, LanguageModel, NotetronError};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse,
};

/// Base URL for the OpenAI API.
const API_BASE_URL: &str = "https://api.openai.com";

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    chat_model: String,
    embedding_model: String,
    max_retries: u32,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key for authentication
    /// * `chat_model` - Completion model identifier
    /// * `embedding_model` - Embedding model identifier
    pub fn new(
        api_key: &str,
        chat_model: String,
        embedding_model: String,
    ) -> Result<Self, NotetronError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                NotetronError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| NotetronError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            chat_model,
            embedding_model,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Creates a client from the validated configuration group.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, NotetronError> {
        Self::new(
            &config.api_key,
            config.chat_model.clone(),
            config.embedding_model.clone(),
        )
    }

    /// Returns the completion model identifier.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Returns the embedding model identifier.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends one JSON request and parses the JSON response.
    ///
    /// On transient errors (429, 500, 502, 503), retries once after a
    /// 1-second delay.
    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, NotetronError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| NotetronError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| NotetronError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed: T =
                    serde_json::from_str(&body).map_err(|e| NotetronError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(parsed);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(NotetronError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                match api_err.error.type_ {
                    Some(kind) => format!("OpenAI API error ({kind}): {}", api_err.error.message),
                    None => format!("OpenAI API error: {}", api_err.error.message),
                }
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(NotetronError::Provider {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| NotetronError::Provider {
            message: "request failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, NotetronError> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };
        let response: ChatResponse = self.post_json("/v1/chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| NotetronError::Provider {
                message: "completion response contained no choices".into(),
                source: None,
            })
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, NotetronError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: texts.to_vec(),
        };
        let response: EmbeddingResponse = self.post_json("/v1/embeddings", &request).await?;
        if response.data.len() != texts.len() {
            return Err(NotetronError::Provider {
                message: format!(
                    "embedding response returned {} vectors for {} inputs",
                    response.data.len(),
                    texts.len()
                ),
                source: None,
            });
        }

        // Restore request order; the API indexes each vector but does
        // not promise response order.
        let mut data = response.data;
        data.sort_by_key(|datum| datum.index);
        Ok(data.into_iter().map(|datum| datum.embedding).collect())
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
