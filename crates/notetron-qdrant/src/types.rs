// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qdrant REST API request/response types.

use serde::{Deserialize, Serialize};

// --- Upsert types ---

/// Body of a points upsert request.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertRequest {
    pub points: Vec<UpsertPoint>,
}

/// One point within an upsert request. The payload carries the full
/// chunk so search results can be decoded without a second lookup.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

// --- Search types ---

/// Body of a points search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub vector: &'a [f32],
    pub limit: usize,
    pub with_payload: bool,
    pub filter: Filter,
}

/// Payload filter; every condition in `must` has to hold.
#[derive(Debug, Clone, Serialize)]
pub struct Filter {
    pub must: Vec<Condition>,
}

/// A single match condition on a payload key.
#[derive(Debug, Clone, Serialize)]
pub struct Condition {
    pub key: String,
    #[serde(rename = "match")]
    pub match_: MatchAny,
}

/// Matches when the payload value equals any of the listed values.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAny {
    pub any: Vec<String>,
}

/// Response from a points search request.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub result: Vec<SearchHit>,
}

/// One scored hit within a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    #[serde(default)]
    pub payload: serde_json::Value,
}

// --- Error types ---

/// Error envelope returned by Qdrant on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub status: ApiErrorStatus,
}

/// Error detail within an error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorStatus {
    pub error: String,
}
