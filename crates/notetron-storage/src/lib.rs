// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Notetron.
//!
//! Owns the idempotency ledger and the conversation history. All access
//! goes through a single async connection so that writes serialize
//! without explicit locking; migrations run on open.

pub mod database;
pub mod migrations;
pub mod queries;

pub use database::Database;
pub use queries::idempotency::ClaimOutcome;
