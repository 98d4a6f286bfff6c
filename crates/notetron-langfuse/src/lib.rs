// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Langfuse adapter for Notetron.
//!
//! One [`LangfuseClient`] implements both the prompt-store and the
//! trace-sink handle against the Langfuse HTTP API.

pub mod client;
pub mod types;

pub use client::LangfuseClient;
