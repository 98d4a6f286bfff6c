// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Qdrant points API.
//!
//! Provides [`QdrantClient`] which writes embedded chunks and runs
//! similarity searches against one collection. Search always applies
//! the owner visibility filter; there is no unfiltered path.

use std::time::Duration;

use async_trait::async_trait;
use notetron_config::QdrantConfig;
use notetron_core::{DocumentChunk, EmbeddedChunk, NotetronError, ScoredChunk, VectorStore, SHARED_OWNER};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, Condition, Filter, MatchAny, SearchRequest, SearchResponse, UpsertPoint,
    UpsertRequest,
};

/// HTTP client for Qdrant communication.
///
/// Manages the api-key header, connection pooling, and retry logic for
/// transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct QdrantClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    max_retries: u32,
}

impl QdrantClient {
    /// Creates a new Qdrant client for one collection.
    pub fn new(base_url: String, api_key: &str, collection: String) -> Result<Self, NotetronError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                NotetronError::Config(format!("invalid API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| NotetronError::VectorStore {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection,
            max_retries: 1,
        })
    }

    /// Creates a client from the validated configuration group.
    pub fn from_config(config: &QdrantConfig) -> Result<Self, NotetronError> {
        Self::new(
            config.url.clone(),
            &config.api_key,
            config.collection.clone(),
        )
    }

    /// Returns the collection this client reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Writes one batch of points, waiting until Qdrant has applied it.
    ///
    /// On transient errors, retries once after a 1-second delay.
    async fn upsert_points(&self, points: Vec<UpsertPoint>) -> Result<(), NotetronError> {
        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.base_url, self.collection
        );
        let body = UpsertRequest { points };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying upsert after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .put(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| NotetronError::VectorStore {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, points = body.points.len(), "upsert response received");

            if status.is_success() {
                return Ok(());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(NotetronError::VectorStore {
                    message: format!("upsert returned {status}: {text}"),
                    source: None,
                });
                continue;
            }

            return Err(error_from_body(status, response).await);
        }

        Err(last_error.unwrap_or_else(|| NotetronError::VectorStore {
            message: "upsert failed after retries".into(),
            source: None,
        }))
    }

    /// Runs one filtered similarity search.
    ///
    /// On transient errors, retries once after a 1-second delay.
    async fn search_points(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<SearchResponse, NotetronError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying search after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| NotetronError::VectorStore {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "search response received");

            if status.is_success() {
                return response
                    .json::<SearchResponse>()
                    .await
                    .map_err(|e| NotetronError::VectorStore {
                        message: format!("failed to parse search response: {e}"),
                        source: Some(Box::new(e)),
                    });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(NotetronError::VectorStore {
                    message: format!("search returned {status}: {text}"),
                    source: None,
                });
                continue;
            }

            return Err(error_from_body(status, response).await);
        }

        Err(last_error.unwrap_or_else(|| NotetronError::VectorStore {
            message: "search failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl VectorStore for QdrantClient {
    async fn upsert(&self, points: &[EmbeddedChunk]) -> Result<(), NotetronError> {
        if points.is_empty() {
            return Ok(());
        }
        let wire = points
            .iter()
            .map(|point| {
                Ok(UpsertPoint {
                    id: point.point_id.clone(),
                    vector: point.vector.clone(),
                    payload: serde_json::to_value(&point.chunk).map_err(|e| {
                        NotetronError::VectorStore {
                            message: format!("failed to encode chunk payload: {e}"),
                            source: Some(Box::new(e)),
                        }
                    })?,
                })
            })
            .collect::<Result<Vec<_>, NotetronError>>()?;
        self.upsert_points(wire).await
    }

    async fn search(
        &self,
        vector: &[f32],
        owner_key: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, NotetronError> {
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
            filter: Filter {
                must: vec![Condition {
                    key: "ownerId".to_string(),
                    match_: MatchAny {
                        any: vec![owner_key.to_string(), SHARED_OWNER.to_string()],
                    },
                }],
            },
        };
        let response = self.search_points(&request).await?;
        response
            .result
            .into_iter()
            .map(|hit| {
                let chunk: DocumentChunk = serde_json::from_value(hit.payload).map_err(|e| {
                    NotetronError::VectorStore {
                        message: format!("failed to decode chunk payload: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
                Ok(ScoredChunk {
                    chunk,
                    score: hit.score,
                })
            })
            .collect()
    }
}

/// Builds the error for a non-transient failure, preferring the error
/// text Qdrant puts in its status envelope.
async fn error_from_body(status: reqwest::StatusCode, response: reqwest::Response) -> NotetronError {
    let body = response.text().await.unwrap_or_default();
    let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
        format!("Qdrant error: {}", api_err.status.error)
    } else {
        format!("Qdrant returned {status}: {body}")
    };
    NotetronError::VectorStore {
        message,
        source: None,
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
