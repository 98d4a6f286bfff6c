// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query functions, grouped per table.

pub mod history;
pub mod idempotency;
