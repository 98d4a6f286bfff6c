// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trace-sink trait for the external observability collaborator.

use async_trait::async_trait;

use crate::error::NotetronError;
use crate::types::TraceEvent;

/// Handle to the trace collaborator.
///
/// Recording is best-effort at the call sites: a failed trace is logged
/// and swallowed, never allowed to abort the traced operation.
#[async_trait]
pub trait TraceSink: Send + Sync {
    /// Ships one trace event.
    async fn record(&self, event: TraceEvent) -> Result<(), NotetronError>;
}
