// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack integration for the Notetron answering service.
//!
//! Translates Slack Events API payloads into the typed [`Request`]
//! values processed by the gate. Filtering happens here: system
//! subtypes and envelopes without a usable deduplication identifier
//! never reach the pipeline.
//!
//! [`Request`]: notetron_core::Request

pub mod envelope;

pub use envelope::{parse_slack_timestamp, MessageEnvelope, SlashCommand};
