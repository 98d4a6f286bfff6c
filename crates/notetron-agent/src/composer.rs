// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly and answer generation.
//!
//! The [`AnswerComposer`] turns one message event into one answer:
//! - Loads the two most recent conversation turns as short-term memory
//! - Retrieves visible document chunks for the question
//! - Compiles the externally versioned prompt template
//! - Runs a temperature-0 completion and traces it best-effort
//! - Writes the question itself back into the vector index

use std::sync::Arc;

use chrono::{DateTime, Locale, Utc};
use notetron_core::{
    ChunkKind, ConversationTurn, DocumentChunk, EmbeddedChunk, Embedder, LanguageModel,
    MessageEvent, NotetronError, PromptStore, ScoredChunk, TraceEvent, TraceSink, VectorStore,
};
use notetron_storage::queries::history;
use notetron_storage::Database;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::retriever::Retriever;

/// Turns of short-term memory included in the prompt.
pub const HISTORY_LIMIT: usize = 2;

/// Long-form German date shape substituted into the prompt and prefixed
/// onto message embeddings.
const DATE_FORMAT: &str = "%A, %-d. %B %Y %H:%M";

/// Deployment-scoped values the composer stamps into prompts and chunks.
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    /// Template name in the external template store.
    pub prompt_name: String,
    /// Deployment version string for the `version` slot.
    pub version: String,
    /// Build phase stamped onto message embeddings.
    pub phase: i64,
    /// Model label attached to generation traces.
    pub model_name: String,
}

/// Composes one answer per message event.
///
/// The composer never touches the idempotency record; the gate owns the
/// record lifecycle and appends the conversation turn once the answer
/// is produced.
pub struct AnswerComposer {
    db: Database,
    retriever: Retriever,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    model: Arc<dyn LanguageModel>,
    prompts: Arc<dyn PromptStore>,
    traces: Arc<dyn TraceSink>,
    settings: ComposerSettings,
}

impl AnswerComposer {
    pub fn new(
        db: Database,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        model: Arc<dyn LanguageModel>,
        prompts: Arc<dyn PromptStore>,
        traces: Arc<dyn TraceSink>,
        settings: ComposerSettings,
    ) -> Self {
        let retriever = Retriever::new(embedder.clone(), store.clone());
        Self {
            db,
            retriever,
            embedder,
            store,
            model,
            prompts,
            traces,
            settings,
        }
    }

    /// Produces the answer text for one message event.
    ///
    /// Any failure before the return leaves the answer unproduced, so the
    /// gate keeps the identifier retryable and the turn is never written.
    pub async fn answer(&self, event: &MessageEvent) -> Result<String, NotetronError> {
        let owner_key = event.owner_key();

        let turns = history::recent(&self.db, &event.user_id, HISTORY_LIMIT).await?;
        let history = format_history(&turns);

        let hits = self.retriever.search(&event.text, owner_key).await?;
        let context = format_context(&hits);

        let template = self.prompts.fetch(&self.settings.prompt_name).await?;
        let date = localized_date(Utc::now());
        let prompt = template.compile(&[
            ("context", context.as_str()),
            ("history", history.as_str()),
            ("question", event.text.as_str()),
            ("date", date.as_str()),
            ("version", self.settings.version.as_str()),
            ("user", owner_key),
        ]);

        debug!(
            identifier = event.identifier.0.as_str(),
            template_version = template.version,
            context_chunks = hits.len(),
            history_turns = turns.len(),
            "prompt composed"
        );

        let answer = self.model.complete(&prompt).await?;

        let trace = TraceEvent {
            name: "answer".to_string(),
            model: Some(self.settings.model_name.clone()),
            input: json!({ "question": event.text, "prompt": prompt }),
            output: json!(answer),
            metadata: json!({
                "user": owner_key,
                "promptName": template.name,
                "promptVersion": template.version,
                "version": self.settings.version,
            }),
        };
        if let Err(err) = self.traces.record(trace).await {
            warn!(error = %err, "trace record failed, continuing");
        }

        self.remember_question(event, owner_key, &date).await?;

        Ok(answer)
    }

    /// Writes the question into the vector index under the event's owner
    /// so future turns can retrieve it. The date prefix carries when the
    /// question was asked.
    async fn remember_question(
        &self,
        event: &MessageEvent,
        owner_key: &str,
        date: &str,
    ) -> Result<(), NotetronError> {
        let content = format!("{date} :{}", event.text);
        let vectors = self.embedder.embed(&[content.clone()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| NotetronError::Provider {
                message: "embedding response was empty".to_string(),
                source: None,
            })?;

        let uid = Uuid::new_v4().to_string();
        let chunk = DocumentChunk {
            content,
            uid: uid.clone(),
            phase: self.settings.phase,
            kind: ChunkKind::Message,
            timestamp: event.timestamp,
            owner_id: owner_key.to_string(),
            source_document: None,
            source_metadata: None,
            content_hash: None,
        };
        self.store
            .upsert(&[EmbeddedChunk {
                point_id: uid,
                vector,
                chunk,
            }])
            .await
    }
}

/// Formats turns as alternating user/assistant lines in the order the
/// store returned them, most recent first.
fn format_history(turns: &[ConversationTurn]) -> String {
    let mut lines = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        lines.push(format!("user: {}", turn.query));
        lines.push(format!("assistant: {}", turn.response));
    }
    lines.join("\n")
}

/// Joins retrieved chunk contents with blank lines, best match first.
fn format_context(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|hit| hit.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Long-form German date, e.g. "Donnerstag, 21. August 2026 14:30".
fn localized_date(now: DateTime<Utc>) -> String {
    now.format_localized(DATE_FORMAT, Locale::de_DE).to_string()
}
