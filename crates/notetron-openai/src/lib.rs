// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI adapter for Notetron.
//!
//! One [`OpenAiClient`] implements both the completion and the
//! embedding handle against the OpenAI HTTP API.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
