// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotency record operations.
//!
//! The claim is the single synchronization point for event processing:
//! whoever wins the atomic create-if-absent owns the dispatch for that
//! identifier. Everyone else sees the existing record.

use notetron_core::{IdempotencyState, NotetronError};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;

/// A Pending record older than this belongs to an invocation that was
/// killed by its hosting deadline; the claim may take it over so the
/// identifier stays retryable.
const STALE_PENDING_MODIFIER: &str = "-15 minutes";

/// Result of attempting to claim an identifier for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller created (or reclaimed) the Pending record and owns
    /// the dispatch.
    Claimed,
    /// A Completed record already exists; its stored result is returned
    /// instead of dispatching again.
    Completed(Option<String>),
    /// A live Pending record (another delivery is in flight) or a
    /// terminal Failed record exists. The caller must stay silent.
    InFlight,
}

/// Atomically claim `identifier`, creating its Pending record if absent.
///
/// Reclaims only stale Pending records; fresh Pending, Completed and
/// Failed records are left untouched and reported via the outcome.
pub async fn claim(db: &Database, identifier: &str) -> Result<ClaimOutcome, NotetronError> {
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let claimed = tx.execute(
                "INSERT INTO idempotency_records (identifier, state, created_at, updated_at)
                 VALUES (?1, 'pending', strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                         strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(identifier) DO UPDATE SET
                     state = 'pending',
                     result = NULL,
                     created_at = excluded.created_at,
                     updated_at = excluded.updated_at
                 WHERE idempotency_records.state = 'pending'
                   AND idempotency_records.created_at
                       < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?2)",
                params![identifier, STALE_PENDING_MODIFIER],
            )?;

            let outcome = if claimed == 1 {
                ClaimOutcome::Claimed
            } else {
                let (state, result): (String, Option<String>) = tx.query_row(
                    "SELECT state, result FROM idempotency_records WHERE identifier = ?1",
                    params![identifier],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                match IdempotencyState::from_str_value(&state) {
                    Some(IdempotencyState::Completed) => ClaimOutcome::Completed(result),
                    _ => ClaimOutcome::InFlight,
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition `identifier` from Pending to Completed, storing the answer.
pub async fn complete(db: &Database, identifier: &str, result: &str) -> Result<(), NotetronError> {
    let identifier = identifier.to_string();
    let result = result.to_string();
    db.connection()
        .call(move |conn| {
            let updated = conn.execute(
                "UPDATE idempotency_records SET state = 'completed', result = ?2,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE identifier = ?1 AND state = 'pending'",
                params![identifier, result],
            )?;
            if updated != 1 {
                return Err(tokio_rusqlite::Error::Other(
                    "identifier is not in pending state".into(),
                ));
            }
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition to Completed and append the conversation turn in one
/// transaction. A turn is never written for an unfinished answer.
pub async fn complete_with_turn(
    db: &Database,
    identifier: &str,
    answer: &str,
    user_key: &str,
    scope_key: &str,
    query: &str,
) -> Result<(), NotetronError> {
    let identifier = identifier.to_string();
    let answer = answer.to_string();
    let user_key = user_key.to_string();
    let scope_key = scope_key.to_string();
    let query = query.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let updated = tx.execute(
                "UPDATE idempotency_records SET state = 'completed', result = ?2,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE identifier = ?1 AND state = 'pending'",
                params![identifier, answer],
            )?;
            if updated != 1 {
                return Err(tokio_rusqlite::Error::Other(
                    "identifier is not in pending state".into(),
                ));
            }

            tx.execute(
                "INSERT INTO conversation_turns (user_key, scope_key, query, response)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_key, scope_key, query, answer],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Revert `identifier` to absent after a transient dispatch failure,
/// allowing a future redelivery to retry.
pub async fn release(db: &Database, identifier: &str) -> Result<(), NotetronError> {
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM idempotency_records WHERE identifier = ?1 AND state = 'pending'",
                params![identifier],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark `identifier` terminally Failed. Later deliveries of the same
/// identifier are dropped instead of retried.
pub async fn fail(db: &Database, identifier: &str) -> Result<(), NotetronError> {
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE idempotency_records SET state = 'failed',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE identifier = ?1 AND state = 'pending'",
                params![identifier],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the current state and stored result for `identifier`.
pub async fn get(
    db: &Database,
    identifier: &str,
) -> Result<Option<(IdempotencyState, Option<String>)>, NotetronError> {
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT state, result FROM idempotency_records WHERE identifier = ?1",
                    params![identifier],
                    |row| {
                        let state: String = row.get(0)?;
                        let result: Option<String> = row.get(1)?;
                        Ok((state, result))
                    },
                )
                .optional()?;
            Ok(row.and_then(|(state, result)| {
                IdempotencyState::from_str_value(&state).map(|s| (s, result))
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
