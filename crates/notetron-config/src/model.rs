// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! `RawConfig` is what figment deserializes: required keys are `Option`s so
//! a missing group can be reported as one named error instead of a serde
//! failure on the first absent field. `Config` is the validated form handed
//! to the rest of the service. All structs use `#[serde(deny_unknown_fields)]`
//! to reject unrecognized keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level configuration as deserialized, before required-group validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Chat-platform settings.
    #[serde(default)]
    pub slack: SlackSection,

    /// Language-model and embedding API settings.
    #[serde(default)]
    pub openai: OpenAiSection,

    /// Vector-store settings.
    #[serde(default)]
    pub qdrant: QdrantSection,

    /// Tracing and prompt-template store settings.
    #[serde(default)]
    pub langfuse: LangfuseSection,

    /// History/idempotency store settings.
    #[serde(default)]
    pub history: HistorySection,

    /// Deployment identity settings.
    #[serde(default)]
    pub service: ServiceSection,
}

/// Chat-platform settings (raw).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackSection {
    /// Request signing secret used by the transport layer.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Bot token used by the transport layer.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Language-model API settings (raw).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiSection {
    /// API key for completions and embeddings.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Completion model.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model, shared by ingestion and retrieval.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

/// Vector-store settings (raw).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QdrantSection {
    /// Base URL of the vector store.
    #[serde(default)]
    pub url: Option<String>,

    /// API key sent with every request.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection holding document and message chunks.
    #[serde(default)]
    pub collection: Option<String>,
}

/// Tracing and prompt-template store settings (raw).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LangfuseSection {
    #[serde(default)]
    pub public_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    /// Endpoint for both template fetches and trace ingestion.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the answer prompt template.
    #[serde(default = "default_prompt_name")]
    pub prompt_name: String,
}

impl Default for LangfuseSection {
    fn default() -> Self {
        Self {
            public_key: None,
            secret_key: None,
            base_url: None,
            prompt_name: default_prompt_name(),
        }
    }
}

fn default_prompt_name() -> String {
    "notetron".to_string()
}

/// History/idempotency store settings (raw).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistorySection {
    /// SQLite database path holding idempotency records and turns.
    #[serde(default)]
    pub path: Option<String>,
}

/// Deployment identity settings (raw).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    /// Build phase stamped onto every embedded chunk.
    #[serde(default)]
    pub phase: Option<i64>,

    /// Deployment version string, substituted into prompts and
    /// reported by the version command.
    #[serde(default)]
    pub version: Option<String>,

    /// Boolean-like flag; exactly "TRUE" enables debug logging.
    #[serde(default)]
    pub verbose: Option<String>,

    /// Service name attached to emitted traces.
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            phase: None,
            version: None,
            verbose: None,
            name: default_service_name(),
        }
    }
}

fn default_service_name() -> String {
    "Notetron".to_string()
}

// --- Validated configuration ---

/// Fully-validated configuration: every required group is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub slack: SlackConfig,
    pub openai: OpenAiConfig,
    pub qdrant: QdrantConfig,
    pub langfuse: LangfuseConfig,
    pub history: HistoryConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub signing_secret: String,
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub chat_model: String,
    pub embedding_model: String,
}

#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct LangfuseConfig {
    pub public_key: String,
    pub secret_key: String,
    pub base_url: String,
    pub prompt_name: String,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub phase: i64,
    pub version: String,
    pub verbose: bool,
    pub name: String,
}
