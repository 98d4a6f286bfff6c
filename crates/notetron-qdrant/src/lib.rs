// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qdrant adapter for Notetron.
//!
//! [`QdrantClient`] implements the vector-store handle over the Qdrant
//! REST API, one collection per deployment.

pub mod client;
pub mod types;

pub use client::QdrantClient;
