// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history operations.

use notetron_core::{ConversationTurn, NotetronError};
use rusqlite::params;

use crate::database::Database;

/// Append a completed question/answer turn for `user_key`.
pub async fn append(
    db: &Database,
    user_key: &str,
    scope_key: &str,
    query: &str,
    response: &str,
) -> Result<(), NotetronError> {
    let user_key = user_key.to_string();
    let scope_key = scope_key.to_string();
    let query = query.to_string();
    let response = response.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_turns (user_key, scope_key, query, response)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_key, scope_key, query, response],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the most recent turns for `user_key`, newest first.
///
/// The insertion id breaks ties between turns written within the same
/// timestamp tick.
pub async fn recent(
    db: &Database,
    user_key: &str,
    limit: usize,
) -> Result<Vec<ConversationTurn>, NotetronError> {
    let user_key = user_key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_key, scope_key, query, response, timestamp
                 FROM conversation_turns
                 WHERE user_key = ?1
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?2",
            )?;
            let turns = stmt
                .query_map(params![user_key, limit as i64], |row| {
                    Ok(ConversationTurn {
                        user_key: row.get(0)?,
                        scope_key: row.get(1)?,
                        query: row.get(2)?,
                        response: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
