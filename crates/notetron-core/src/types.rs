// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Notetron service crates.

use serde::{Deserialize, Serialize};

/// Stable deduplication key for one logical inbound event.
///
/// The delivering platform reuses the same identifier when it redelivers
/// an event, so this is the unit of at-most-once processing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Conversational scope of a message event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Private one-on-one conversation; visibility keys on the user.
    Direct,
    /// Group context; visibility keys on the group id.
    Group,
}

/// A chat message event as delivered by the chat platform.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub identifier: EventId,
    pub user_id: String,
    pub scope_id: String,
    pub scope_kind: ScopeKind,
    pub text: String,
    /// Seconds since epoch, taken from the platform event timestamp.
    pub timestamp: i64,
}

impl MessageEvent {
    /// The identity that scopes retrieval visibility for this event:
    /// the user in a direct conversation, the group otherwise.
    pub fn owner_key(&self) -> &str {
        match self.scope_kind {
            ScopeKind::Direct => &self.user_id,
            ScopeKind::Group => &self.scope_id,
        }
    }
}

/// A typed inbound request, dispatched exhaustively by the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Deployment-version probe from a slash command.
    Version { identifier: EventId },
    /// Question to be answered from a chat message.
    Answer(MessageEvent),
}

impl Request {
    /// The deduplication identifier carried by this request.
    pub fn identifier(&self) -> &EventId {
        match self {
            Request::Version { identifier } => identifier,
            Request::Answer(event) => &event.identifier,
        }
    }
}

/// Lifecycle state of an idempotency record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyState {
    Pending,
    Completed,
    Failed,
}

impl IdempotencyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdempotencyState::Pending => "pending",
            IdempotencyState::Completed => "completed",
            IdempotencyState::Failed => "failed",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IdempotencyState::Pending),
            "completed" => Some(IdempotencyState::Completed),
            "failed" => Some(IdempotencyState::Failed),
            _ => None,
        }
    }
}

/// One completed question/answer exchange, persisted for short-term memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub user_key: String,
    pub scope_key: String,
    pub query: String,
    pub response: String,
    /// Assigned by the store at append time (UTC ISO-8601).
    pub timestamp: String,
}

/// Origin of an embedded chunk, stored in the index payload as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// A user question captured during answering.
    Message,
    /// A slice of an ingested source document.
    ExternalDocument,
}

/// A bounded slice of text plus the metadata stored alongside its vector.
///
/// Field names here are the wire payload schema of the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    pub content: String,
    /// Fresh per write, never reused.
    pub uid: String,
    /// Build phase the chunk was written under.
    pub phase: i64,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// Seconds since epoch.
    pub timestamp: i64,
    /// Concrete user/scope id, or "shared" for corpus-wide visibility.
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_metadata: Option<serde_json::Value>,
    /// Dedup key for re-ingested documents: hash of normalized content
    /// plus source name. Absent on message chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Identity every retrieval query may see, regardless of who issued it.
pub const SHARED_OWNER: &str = "shared";

/// A chunk paired with the vector and index id it is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub point_id: String,
    pub vector: Vec<f32>,
    pub chunk: DocumentChunk,
}

/// A chunk returned from a similarity search, with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// A versioned prompt template fetched from the template store.
///
/// Template text is opaque apart from `{{slot}}` markers.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pub name: String,
    pub version: i64,
    pub template: String,
}

impl PromptTemplate {
    /// Substitutes `{{key}}` markers with the given values.
    /// Unknown markers are left in place.
    pub fn compile(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.template.clone();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        out
    }
}

/// One observable unit of work shipped to the trace collaborator.
#[derive(Debug, Clone, Default)]
pub struct TraceEvent {
    pub name: String,
    pub model: Option<String>,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    pub metadata: serde_json::Value,
}

/// Counts reported after a document ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionSummary {
    pub pages: usize,
    pub chunks: usize,
    pub embedded: usize,
}

/// Result of offering a document to the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    Completed(IngestionSummary),
    /// Unsupported document type; skipped without error.
    Skipped,
}
