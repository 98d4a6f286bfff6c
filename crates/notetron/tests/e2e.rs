// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete answering pipeline.
//!
//! Each test wires temp SQLite storage and mock service handles into the
//! real gate and composer, then drives them with Slack envelopes the way
//! one platform delivery would.

use std::sync::Arc;

use notetron_agent::{AnswerComposer, ComposerSettings, IdempotencyGate};
use notetron_core::{ChunkKind, DocumentChunk, NotetronError, ScoredChunk, SHARED_OWNER};
use notetron_slack::{MessageEnvelope, SlashCommand};
use notetron_storage::queries::history;
use notetron_storage::Database;
use notetron_test_utils::{
    MockEmbedder, MockModel, MockPromptStore, MockTraceSink, MockVectorStore,
};
use tempfile::tempdir;

struct Harness {
    gate: IdempotencyGate,
    model: Arc<MockModel>,
    store: Arc<MockVectorStore>,
    db: Database,
    _dir: tempfile::TempDir,
}

impl Harness {
    async fn new() -> Self {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("e2e.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let model = Arc::new(MockModel::new());
        let store = Arc::new(MockVectorStore::new());
        let composer = AnswerComposer::new(
            db.clone(),
            Arc::new(MockEmbedder::default()),
            store.clone(),
            model.clone(),
            Arc::new(MockPromptStore::new()),
            Arc::new(MockTraceSink::new()),
            ComposerSettings {
                prompt_name: "notetron".to_string(),
                version: "2.0.1".to_string(),
                phase: 2,
                model_name: "gpt-3.5-turbo".to_string(),
            },
        );
        let gate = IdempotencyGate::new(db.clone(), composer, "2.0.1");

        Self {
            gate,
            model,
            store,
            db,
            _dir: dir,
        }
    }

    /// Parses a Slack message payload and processes it, exactly as one
    /// platform delivery would.
    async fn deliver(&self, payload: &str) -> Result<Option<String>, NotetronError> {
        let envelope: MessageEnvelope = serde_json::from_str(payload).unwrap();
        match envelope.to_request() {
            Some(request) => self.gate.process(&request).await,
            None => Ok(None),
        }
    }
}

fn message_payload(identifier: &str, text: &str) -> String {
    serde_json::json!({
        "type": "message",
        "client_msg_id": identifier,
        "user": "U1",
        "channel": "D1",
        "channel_type": "im",
        "text": text,
        "ts": "1726000000.000500",
        "team": "T1",
    })
    .to_string()
}

#[tokio::test]
async fn message_event_is_answered_and_remembered() {
    let harness = Harness::new().await;
    harness
        .model
        .add_reply("Phase 2 starts in autumn.".to_string())
        .await;
    harness
        .store
        .push_results(vec![ScoredChunk {
            chunk: DocumentChunk {
                content: "Phase 2 begins after the summer break.".to_string(),
                uid: "doc-1".to_string(),
                phase: 1,
                kind: ChunkKind::ExternalDocument,
                timestamp: 0,
                owner_id: SHARED_OWNER.to_string(),
                source_document: Some("plan.pdf".to_string()),
                source_metadata: None,
                content_hash: None,
            },
            score: 0.93,
        }])
        .await;

    let answer = harness
        .deliver(&message_payload("m1", "What is phase 2?"))
        .await
        .unwrap();
    assert_eq!(answer.as_deref(), Some("Phase 2 starts in autumn."));

    // Retrieval ran under the author's visibility with the fixed limit.
    let calls = harness.store.search_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].owner_key, "U1");
    assert_eq!(calls[0].limit, 4);

    // The exchange is persisted for short-term memory.
    let turns = history::recent(&harness.db, "U1", 10).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].query, "What is phase 2?");
    assert_eq!(turns[0].response, "Phase 2 starts in autumn.");

    // The question itself is now retrievable as a message chunk.
    let points = harness.store.upserted_points().await;
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].chunk.kind, ChunkKind::Message);
    assert_eq!(points[0].chunk.owner_id, "U1");
}

#[tokio::test]
async fn redelivered_event_answers_once_and_repeats_the_result() {
    let harness = Harness::new().await;
    let payload = message_payload("m1", "What is phase 2?");

    let first = harness.deliver(&payload).await.unwrap();
    let second = harness.deliver(&payload).await.unwrap();

    assert_eq!(first.as_deref(), Some("mock completion"));
    assert_eq!(second, first);
    assert_eq!(harness.model.call_count().await, 1);
    assert_eq!(
        history::recent(&harness.db, "U1", 10).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn filtered_subtype_never_reaches_the_gate() {
    let harness = Harness::new().await;
    let payload = serde_json::json!({
        "client_msg_id": "m9",
        "user": "U1",
        "channel": "C9",
        "subtype": "channel_join",
        "text": "U1 joined",
        "ts": "1726000002.000100",
    })
    .to_string();

    let answer = harness.deliver(&payload).await.unwrap();
    assert_eq!(answer, None);
    assert_eq!(harness.model.call_count().await, 0);
    assert!(harness.store.upserted_points().await.is_empty());
}

#[tokio::test]
async fn version_command_round_trips_through_the_gate() {
    let harness = Harness::new().await;
    let command: SlashCommand = serde_json::from_value(serde_json::json!({
        "trigger_id": "t-100",
        "command": "/version",
        "user_id": "U1",
    }))
    .unwrap();

    let request = command.to_request().unwrap();
    let reply = harness.gate.process(&request).await.unwrap();
    assert_eq!(reply.as_deref(), Some("My version is 2.0.1"));

    // Version probes never become conversation turns.
    assert!(history::recent(&harness.db, "U1", 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn transient_failure_keeps_the_event_retryable() {
    let harness = Harness::new().await;
    harness
        .model
        .add_failure(NotetronError::Provider {
            message: "rate limited".to_string(),
            source: None,
        })
        .await;
    let payload = message_payload("m1", "What is phase 2?");

    let err = harness.deliver(&payload).await.unwrap_err();
    assert!(err.is_transient());

    // The platform redelivers; this time the answer goes through.
    let answer = harness.deliver(&payload).await.unwrap();
    assert_eq!(answer.as_deref(), Some("mock completion"));
    assert_eq!(harness.model.call_count().await, 2);
}
