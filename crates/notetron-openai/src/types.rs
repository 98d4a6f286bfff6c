// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI API request/response types.

use serde::{Deserialize, Serialize};

// --- Chat completion types ---

/// A request to the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Sampling temperature. Always 0 here so identical context yields
    /// identical answers.
    pub temperature: f32,

    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message role ("user", "assistant", "system").
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Response from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Generated choices; the first one carries the answer.
    pub choices: Vec<ChatChoice>,
}

/// One generated completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

/// The assistant message within a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub content: String,
}

// --- Embedding types ---

/// A request to the embeddings endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest {
    /// Model identifier (e.g., "text-embedding-ada-002").
    pub model: String,

    /// Texts to embed as one batch.
    pub input: Vec<String>,
}

/// Response from the embeddings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingDatum>,
}

/// One embedding within a batch response.
///
/// The API does not guarantee response order, so `index` is the
/// position in the request input.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingDatum {
    pub index: usize,
    pub embedding: Vec<f32>,
}

// --- Error types ---

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Error category (e.g., "invalid_request_error"). Absent on some
    /// gateway-generated errors.
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub message: String,
}
