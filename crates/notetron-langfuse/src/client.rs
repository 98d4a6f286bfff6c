// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Langfuse prompts and ingestion APIs.
//!
//! One [`LangfuseClient`] serves both handles: versioned prompt
//! templates come from the prompts endpoint, trace events go to the
//! ingestion endpoint. Prompt fetches retry like any other provider
//! call; trace shipping gets a single attempt because every call site
//! treats it as best-effort.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use chrono::Utc;
use notetron_config::LangfuseConfig;
use notetron_core::{NotetronError, PromptStore, PromptTemplate, TraceEvent, TraceSink};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::{
    ApiErrorResponse, IngestionEvent, IngestionRequest, IngestionResponse, PromptResponse,
};

/// HTTP client for Langfuse communication.
///
/// Authenticates with basic auth built from the public/secret key pair.
#[derive(Debug, Clone)]
pub struct LangfuseClient {
    client: reqwest::Client,
    base_url: String,
    service_name: String,
    max_retries: u32,
}

impl LangfuseClient {
    /// Creates a new Langfuse client.
    ///
    /// `service_name` is stamped into the metadata of every emitted
    /// trace so deployments can be told apart in the UI.
    pub fn new(
        base_url: String,
        public_key: &str,
        secret_key: &str,
        service_name: String,
    ) -> Result<Self, NotetronError> {
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{public_key}:{secret_key}"));
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|e| {
                NotetronError::Config(format!("invalid credential header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotetronError::PromptStore {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_name,
            max_retries: 1,
        })
    }

    /// Creates a client from the validated configuration groups.
    pub fn from_config(config: &LangfuseConfig, service_name: String) -> Result<Self, NotetronError> {
        Self::new(
            config.base_url.clone(),
            &config.public_key,
            &config.secret_key,
            service_name,
        )
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Adds the service name to an event's metadata object.
    fn stamp_metadata(&self, metadata: serde_json::Value) -> serde_json::Value {
        match metadata {
            serde_json::Value::Object(mut map) => {
                map.insert(
                    "service".to_string(),
                    serde_json::Value::String(self.service_name.clone()),
                );
                serde_json::Value::Object(map)
            }
            serde_json::Value::Null => {
                serde_json::json!({"service": self.service_name})
            }
            other => serde_json::json!({
                "service": self.service_name,
                "detail": other,
            }),
        }
    }
}

#[async_trait]
impl PromptStore for LangfuseClient {
    async fn fetch(&self, name: &str) -> Result<PromptTemplate, NotetronError> {
        let url = format!("{}/api/public/v2/prompts/{name}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, name, "retrying prompt fetch after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self.client.get(&url).send().await.map_err(|e| {
                NotetronError::PromptStore {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

            let status = response.status();
            debug!(status = %status, attempt, name, "prompt response received");

            if status.is_success() {
                let parsed: PromptResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| NotetronError::PromptStore {
                            message: format!("failed to parse prompt response: {e}"),
                            source: Some(Box::new(e)),
                        })?;
                let template = parsed.prompt.as_str().ok_or_else(|| {
                    NotetronError::PromptStore {
                        message: format!("prompt '{name}' is not a text prompt"),
                        source: None,
                    }
                })?;
                return Ok(PromptTemplate {
                    name: parsed.name,
                    version: parsed.version,
                    template: template.to_string(),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(NotetronError::PromptStore {
                    message: format!("prompt fetch returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("Langfuse error: {}", api_err.message)
            } else {
                format!("Langfuse returned {status}: {body}")
            };
            return Err(NotetronError::PromptStore {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| NotetronError::PromptStore {
            message: "prompt fetch failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl TraceSink for LangfuseClient {
    async fn record(&self, event: TraceEvent) -> Result<(), NotetronError> {
        let now = Utc::now().to_rfc3339();
        let trace_id = Uuid::new_v4().to_string();

        let mut batch = vec![IngestionEvent {
            id: Uuid::new_v4().to_string(),
            type_: "trace-create".to_string(),
            timestamp: now.clone(),
            body: serde_json::json!({
                "id": trace_id,
                "name": event.name,
                "timestamp": now,
                "input": event.input,
                "output": event.output,
                "metadata": self.stamp_metadata(event.metadata),
            }),
        }];

        // A model call inside the traced operation gets its own
        // generation so token-level views line up in the UI.
        if let Some(model) = &event.model {
            batch.push(IngestionEvent {
                id: Uuid::new_v4().to_string(),
                type_: "generation-create".to_string(),
                timestamp: now.clone(),
                body: serde_json::json!({
                    "id": Uuid::new_v4().to_string(),
                    "traceId": trace_id,
                    "name": format!("{}-generation", event.name),
                    "model": model,
                    "startTime": now,
                    "input": event.input,
                    "output": event.output,
                }),
            });
        }

        let url = format!("{}/api/public/ingestion", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&IngestionRequest { batch })
            .send()
            .await
            .map_err(|e| NotetronError::Trace {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "ingestion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotetronError::Trace {
                message: format!("ingestion returned {status}: {body}"),
                source: None,
            });
        }

        // 207 multi-status: the request succeeded but individual events
        // may still have been rejected.
        let parsed: IngestionResponse =
            response.json().await.map_err(|e| NotetronError::Trace {
                message: format!("failed to parse ingestion response: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !parsed.errors.is_empty() {
            return Err(NotetronError::Trace {
                message: format!("ingestion rejected {} event(s)", parsed.errors.len()),
                source: None,
            });
        }
        Ok(())
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> LangfuseClient {
        LangfuseClient::new(
            "http://unused".into(),
            "pk-test",
            "sk-test",
            "Notetron".into(),
        )
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    fn expected_auth() -> String {
        let credentials = base64::engine::general_purpose::STANDARD.encode("pk-test:sk-test");
        format!("Basic {credentials}")
    }

    #[tokio::test]
    async fn fetch_decodes_text_prompt_with_basic_auth() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "prompt-1",
            "name": "notetron",
            "version": 7,
            "type": "text",
            "prompt": "Answer using {{context}} and {{history}}: {{question}}",
            "labels": ["production"],
            "tags": [],
            "config": {}
        });

        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/notetron"))
            .and(header("authorization", expected_auth().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let template = client.fetch("notetron").await.unwrap();
        assert_eq!(template.name, "notetron");
        assert_eq!(template.version, 7);
        assert!(template.template.contains("{{question}}"));
    }

    #[tokio::test]
    async fn fetch_surfaces_api_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Prompt not found",
                "error": "NotFoundError"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.fetch("missing").await.unwrap_err().to_string();
        assert!(err.contains("Prompt not found"), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_rejects_chat_prompts() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": "prompt-2",
            "name": "chatty",
            "version": 1,
            "type": "chat",
            "prompt": [{"role": "system", "content": "hi"}],
            "labels": ["production"],
            "tags": [],
            "config": {}
        });

        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/chatty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.fetch("chatty").await.is_err());
    }

    #[tokio::test]
    async fn record_ships_trace_with_service_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .and(body_partial_json(serde_json::json!({
                "batch": [{
                    "type": "trace-create",
                    "body": {
                        "name": "answer",
                        "metadata": {"service": "Notetron"}
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!({
                "successes": [{"id": "e1", "status": 201}],
                "errors": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client
            .record(TraceEvent {
                name: "answer".to_string(),
                input: serde_json::json!({"question": "What is phase 2?"}),
                output: serde_json::json!({"answer": "It is the second phase."}),
                ..TraceEvent::default()
            })
            .await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn record_adds_generation_for_model_calls() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .and(body_partial_json(serde_json::json!({
                "batch": [
                    {"type": "trace-create"},
                    {"type": "generation-create", "body": {"model": "gpt-3.5-turbo"}}
                ]
            })))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!({
                "successes": [], "errors": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client
            .record(TraceEvent {
                name: "answer".to_string(),
                model: Some("gpt-3.5-turbo".to_string()),
                ..TraceEvent::default()
            })
            .await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn record_reports_rejected_events() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!({
                "successes": [],
                "errors": [{"id": "e1", "status": 400, "message": "bad body"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.record(TraceEvent::default()).await;
        assert!(result.is_err());
    }
}
