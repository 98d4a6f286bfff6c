// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Langfuse API request/response types.

use serde::{Deserialize, Serialize};

// --- Prompt types ---

/// Response from the prompt endpoint. Without a version parameter the
/// endpoint serves the current production-labeled version.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptResponse {
    pub name: String,
    pub version: i64,
    /// Template text for text prompts; an array for chat prompts,
    /// which this service does not use.
    pub prompt: serde_json::Value,
}

// --- Ingestion types ---

/// Body of a trace ingestion request.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionRequest {
    pub batch: Vec<IngestionEvent>,
}

/// One event within an ingestion batch.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionEvent {
    /// Event envelope id, distinct from the entity id in `body`.
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub timestamp: String,
    pub body: serde_json::Value,
}

/// Response from the ingestion endpoint (HTTP 207).
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionResponse {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

// --- Error types ---

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
