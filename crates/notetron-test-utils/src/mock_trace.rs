// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock trace sink capturing events for assertion.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use notetron_core::{NotetronError, TraceEvent, TraceSink};

/// A mock trace sink that captures recorded events.
///
/// Can be switched into a failing mode to verify that callers treat
/// tracing as best-effort.
pub struct MockTraceSink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockTraceSink {
    /// Create a new mock trace sink.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent `record` call fail.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    /// Get all events that were recorded.
    pub async fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().await.clone()
    }
}

impl Default for MockTraceSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TraceSink for MockTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), NotetronError> {
        if *self.failing.lock().await {
            return Err(NotetronError::Trace {
                message: "mock trace failure".into(),
                source: None,
            });
        }
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_events_until_failing() {
        let sink = MockTraceSink::new();
        sink.record(TraceEvent {
            name: "answer".to_string(),
            ..TraceEvent::default()
        })
        .await
        .unwrap();
        assert_eq!(sink.events().await.len(), 1);

        sink.set_failing(true).await;
        assert!(sink.record(TraceEvent::default()).await.is_err());
        assert_eq!(sink.events().await.len(), 1);
    }
}
