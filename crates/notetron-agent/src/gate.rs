// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotency gate: at-most-one dispatch per identifier.
//!
//! The delivering platform retries events at least once and possibly in
//! parallel, so every inbound request passes through here first. The
//! gate claims the identifier with an atomic conditional insert, and
//! only the claiming task dispatches the request. Duplicates are
//! answered from the stored result or dropped silently while the
//! original is still in flight.

use notetron_core::{NotetronError, Request};
use notetron_storage::queries::idempotency;
use notetron_storage::{ClaimOutcome, Database};
use tracing::{debug, error, warn};

use crate::composer::AnswerComposer;

/// Serializes processing per identifier and dispatches claimed requests.
pub struct IdempotencyGate {
    db: Database,
    composer: AnswerComposer,
    version: String,
}

impl IdempotencyGate {
    pub fn new(db: Database, composer: AnswerComposer, version: impl Into<String>) -> Self {
        Self {
            db,
            composer,
            version: version.into(),
        }
    }

    /// Processes one request, returning the answer text to send back.
    ///
    /// `Ok(None)` means stay silent: the identifier was already seen and
    /// no completed answer is available to repeat. A transient dispatch
    /// failure releases the identifier so a redelivery can retry it; a
    /// permanent one marks it failed and it is never dispatched again.
    pub async fn process(&self, request: &Request) -> Result<Option<String>, NotetronError> {
        let identifier = request.identifier().0.as_str();

        match idempotency::claim(&self.db, identifier).await? {
            ClaimOutcome::Completed(result) => {
                debug!(identifier, "duplicate delivery, repeating stored answer");
                Ok(result)
            }
            ClaimOutcome::InFlight => {
                debug!(identifier, "duplicate delivery while unresolved, dropping");
                Ok(None)
            }
            ClaimOutcome::Claimed => match self.dispatch(request).await {
                Ok(answer) => Ok(Some(answer)),
                Err(err) if err.is_transient() => {
                    warn!(identifier, error = %err, "dispatch failed, releasing for redelivery");
                    if let Err(revert) = idempotency::release(&self.db, identifier).await {
                        warn!(identifier, error = %revert, "release failed, record stays pending until stale");
                    }
                    Err(err)
                }
                Err(err) => {
                    error!(identifier, error = %err, "dispatch failed permanently");
                    if let Err(revert) = idempotency::fail(&self.db, identifier).await {
                        warn!(identifier, error = %revert, "failed-state write did not apply");
                    }
                    Err(err)
                }
            },
        }
    }

    /// Runs the claimed request to completion and persists the terminal
    /// state. The conversation turn is written in the same transaction
    /// as the Completed transition, and only for answered questions.
    async fn dispatch(&self, request: &Request) -> Result<String, NotetronError> {
        match request {
            Request::Version { identifier } => {
                let answer = format!("My version is {}", self.version);
                idempotency::complete(&self.db, &identifier.0, &answer).await?;
                Ok(answer)
            }
            Request::Answer(event) => {
                let answer = self.composer.answer(event).await?;
                idempotency::complete_with_turn(
                    &self.db,
                    &event.identifier.0,
                    &answer,
                    &event.user_id,
                    event.owner_key(),
                    &event.text,
                )
                .await?;
                Ok(answer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::composer::ComposerSettings;
    use notetron_core::{EventId, IdempotencyState, MessageEvent, ScopeKind};
    use notetron_storage::queries::history;
    use notetron_test_utils::{
        MockEmbedder, MockModel, MockPromptStore, MockTraceSink, MockVectorStore,
    };
    use tempfile::tempdir;

    struct Fixture {
        gate: Arc<IdempotencyGate>,
        model: Arc<MockModel>,
        store: Arc<MockVectorStore>,
        db: Database,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
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
                version: "1.2.3".to_string(),
                phase: 2,
                model_name: "gpt-3.5-turbo".to_string(),
            },
        );
        let gate = Arc::new(IdempotencyGate::new(db.clone(), composer, "1.2.3"));

        Fixture {
            gate,
            model,
            store,
            db,
            _dir: dir,
        }
    }

    fn message(identifier: &str, text: &str) -> Request {
        Request::Answer(MessageEvent {
            identifier: EventId(identifier.to_string()),
            user_id: "U1".to_string(),
            scope_id: "D1".to_string(),
            scope_kind: ScopeKind::Direct,
            text: text.to_string(),
            timestamp: 1_726_000_000,
        })
    }

    #[tokio::test]
    async fn first_delivery_answers_and_persists_the_turn() {
        let f = fixture().await;
        let request = message("m1", "What is phase 2?");

        let answer = f.gate.process(&request).await.unwrap();
        assert_eq!(answer.as_deref(), Some("mock completion"));

        let turns = history::recent(&f.db, "U1", 10).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].query, "What is phase 2?");
        assert_eq!(turns[0].response, "mock completion");

        let record = idempotency::get(&f.db, "m1").await.unwrap();
        assert_eq!(
            record,
            Some((
                IdempotencyState::Completed,
                Some("mock completion".to_string())
            ))
        );
    }

    #[tokio::test]
    async fn duplicate_while_pending_is_dropped_without_a_second_model_call() {
        let f = fixture().await;

        // Another worker holds the claim.
        assert_eq!(
            idempotency::claim(&f.db, "m1").await.unwrap(),
            ClaimOutcome::Claimed
        );

        let answer = f.gate.process(&message("m1", "What is phase 2?")).await;
        assert_eq!(answer.unwrap(), None);
        assert_eq!(f.model.call_count().await, 0);
        assert!(f.store.upserted_points().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_after_completion_repeats_the_stored_answer() {
        let f = fixture().await;
        f.model.add_reply("the stored answer".to_string()).await;
        let request = message("m1", "What is phase 2?");

        let first = f.gate.process(&request).await.unwrap();
        let second = f.gate.process(&request).await.unwrap();

        assert_eq!(first.as_deref(), Some("the stored answer"));
        assert_eq!(second, first);
        assert_eq!(f.model.call_count().await, 1);

        // The repeat does not append another turn.
        assert_eq!(history::recent(&f.db, "U1", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn version_request_completes_without_a_turn() {
        let f = fixture().await;
        let request = Request::Version {
            identifier: EventId("trigger-1".to_string()),
        };

        let answer = f.gate.process(&request).await.unwrap();
        assert_eq!(answer.as_deref(), Some("My version is 1.2.3"));
        assert_eq!(f.model.call_count().await, 0);
        assert!(history::recent(&f.db, "U1", 10).await.unwrap().is_empty());

        // A redelivery repeats the stored reply.
        let again = f.gate.process(&request).await.unwrap();
        assert_eq!(again.as_deref(), Some("My version is 1.2.3"));
    }

    #[tokio::test]
    async fn transient_failure_releases_the_identifier_for_retry() {
        let f = fixture().await;
        f.model
            .add_failure(NotetronError::Provider {
                message: "model unavailable".to_string(),
                source: None,
            })
            .await;
        let request = message("m1", "What is phase 2?");

        let err = f.gate.process(&request).await.unwrap_err();
        assert!(err.is_transient());

        // Released: no record, no turn, nothing user-visible stored.
        assert_eq!(idempotency::get(&f.db, "m1").await.unwrap(), None);
        assert!(history::recent(&f.db, "U1", 10).await.unwrap().is_empty());

        // The redelivery succeeds.
        let answer = f.gate.process(&request).await.unwrap();
        assert_eq!(answer.as_deref(), Some("mock completion"));
        assert_eq!(f.model.call_count().await, 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_never_redispatched() {
        let f = fixture().await;
        f.model
            .add_failure(NotetronError::Internal("malformed event".to_string()))
            .await;
        let request = message("m1", "What is phase 2?");

        let err = f.gate.process(&request).await.unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(
            idempotency::get(&f.db, "m1").await.unwrap(),
            Some((IdempotencyState::Failed, None))
        );

        // The redelivery is dropped without another dispatch.
        let answer = f.gate.process(&request).await.unwrap();
        assert_eq!(answer, None);
        assert_eq!(f.model.call_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_deliveries_invoke_the_model_exactly_once() {
        let f = fixture().await;
        let request = message("m1", "What is phase 2?");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = f.gate.clone();
            let request = request.clone();
            handles.push(tokio::spawn(async move { gate.process(&request).await }));
        }

        let mut answered = 0;
        for handle in handles {
            if let Some(answer) = handle.await.unwrap().unwrap() {
                assert_eq!(answer, "mock completion");
                answered += 1;
            }
        }

        // One winner dispatched; late arrivals may repeat its answer.
        assert!(answered >= 1);
        assert_eq!(f.model.call_count().await, 1);
        assert_eq!(history::recent(&f.db, "U1", 10).await.unwrap().len(), 1);
    }
}
