// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack event envelopes and their mapping to typed requests.
//!
//! Envelopes are permissive: Slack attaches many fields beyond the ones
//! the service reads, and new ones appear without notice. Everything the
//! gate needs is extracted here; the rest is ignored.

use notetron_core::{EventId, MessageEvent, Request, ScopeKind};
use serde::Deserialize;
use tracing::debug;

/// A `message` event from the Slack Events API.
///
/// All fields are optional on the wire; which ones are present depends
/// on the message subtype. The mapping below decides what is required.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub client_msg_id: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

impl MessageEnvelope {
    /// Whether this envelope is a message the service answers.
    ///
    /// Plain user messages carry no subtype; bot messages pass so the
    /// service can be addressed by other integrations. Every other
    /// subtype is a system notification (joins, edits, topic changes)
    /// and is ignored.
    pub fn should_process(&self) -> bool {
        matches!(self.subtype.as_deref(), None | Some("bot_message"))
    }

    /// Maps the envelope to a typed request.
    ///
    /// Returns `None` for filtered subtypes and for envelopes missing
    /// the fields the gate depends on: the client message id is the
    /// deduplication identifier and must be present and stable.
    pub fn to_request(&self) -> Option<Request> {
        if !self.should_process() {
            debug!(
                subtype = self.subtype.as_deref().unwrap_or_default(),
                "ignoring message subtype"
            );
            return None;
        }

        let identifier = self.client_msg_id.as_deref()?;
        let user = self.user.as_deref()?;
        let channel = self.channel.as_deref()?;
        let text = self.text.as_deref()?;
        let ts = self.ts.as_deref()?;

        let scope_kind = match self.channel_type.as_deref() {
            Some("im") => ScopeKind::Direct,
            _ => ScopeKind::Group,
        };

        Some(Request::Answer(MessageEvent {
            identifier: EventId(identifier.to_string()),
            user_id: user.to_string(),
            scope_id: channel.to_string(),
            scope_kind,
            text: text.to_string(),
            timestamp: parse_slack_timestamp(ts),
        }))
    }
}

/// A slash-command invocation delivered by Slack.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    /// Unique per invocation; Slack reuses it on redelivery.
    pub trigger_id: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SlashCommand {
    /// Maps the command to a typed request. Only `/version` is wired;
    /// unknown commands are dropped.
    pub fn to_request(&self) -> Option<Request> {
        match self.command.as_deref() {
            Some("/version") => Some(Request::Version {
                identifier: EventId(self.trigger_id.clone()),
            }),
            other => {
                debug!(command = other.unwrap_or_default(), "ignoring command");
                None
            }
        }
    }
}

/// Slack timestamps are `"seconds.fractional"` strings. The payload
/// keeps whole seconds; a malformed value falls back to zero rather
/// than dropping the message.
pub fn parse_slack_timestamp(ts: &str) -> i64 {
    ts.split('.')
        .next()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an envelope from JSON matching the Slack Events API shape.
    fn envelope(json: serde_json::Value) -> MessageEnvelope {
        serde_json::from_value(json).expect("failed to deserialize mock envelope")
    }

    #[test]
    fn plain_user_message_maps_to_answer_request() {
        let env = envelope(serde_json::json!({
            "type": "message",
            "client_msg_id": "d6a80d84-8f09-4d63-98c4-86c8135ed94c",
            "user": "U1",
            "channel": "D1",
            "channel_type": "im",
            "text": "What is phase 2?",
            "ts": "1726000000.000500",
            "team": "T1",
            "blocks": [{"type": "rich_text"}],
            "event_ts": "1726000000.000500",
        }));

        let Some(Request::Answer(event)) = env.to_request() else {
            panic!("expected an answer request");
        };
        assert_eq!(event.identifier.0, "d6a80d84-8f09-4d63-98c4-86c8135ed94c");
        assert_eq!(event.user_id, "U1");
        assert_eq!(event.scope_id, "D1");
        assert_eq!(event.scope_kind, ScopeKind::Direct);
        assert_eq!(event.text, "What is phase 2?");
        assert_eq!(event.timestamp, 1_726_000_000);
    }

    #[test]
    fn channel_message_maps_to_group_scope() {
        let env = envelope(serde_json::json!({
            "client_msg_id": "id-1",
            "user": "U1",
            "channel": "C9",
            "channel_type": "channel",
            "text": "hello",
            "ts": "1726000001.000100",
        }));

        let Some(Request::Answer(event)) = env.to_request() else {
            panic!("expected an answer request");
        };
        assert_eq!(event.scope_kind, ScopeKind::Group);
        assert_eq!(event.scope_id, "C9");
        assert_eq!(event.owner_key(), "C9");
    }

    #[test]
    fn system_subtypes_are_ignored() {
        for subtype in ["channel_join", "message_changed", "message_deleted"] {
            let env = envelope(serde_json::json!({
                "client_msg_id": "id-1",
                "user": "U1",
                "channel": "C9",
                "channel_type": "channel",
                "subtype": subtype,
                "text": "ignored",
                "ts": "1726000002.000100",
            }));
            assert!(env.to_request().is_none(), "subtype {subtype} not ignored");
        }
    }

    #[test]
    fn bot_message_subtype_is_processed() {
        let env = envelope(serde_json::json!({
            "client_msg_id": "id-2",
            "user": "U2",
            "channel": "C9",
            "channel_type": "channel",
            "subtype": "bot_message",
            "text": "automated question",
            "ts": "1726000003.000100",
        }));
        assert!(env.to_request().is_some());
    }

    #[test]
    fn message_without_identifier_is_skipped() {
        let env = envelope(serde_json::json!({
            "user": "U1",
            "channel": "D1",
            "channel_type": "im",
            "text": "no client_msg_id here",
            "ts": "1726000004.000100",
        }));
        assert!(env.to_request().is_none());
    }

    #[test]
    fn timestamp_keeps_whole_seconds() {
        assert_eq!(parse_slack_timestamp("1726000000.000500"), 1_726_000_000);
        assert_eq!(parse_slack_timestamp("1726000000"), 1_726_000_000);
        assert_eq!(parse_slack_timestamp("not-a-ts"), 0);
    }

    #[test]
    fn version_command_maps_to_version_request() {
        let cmd: SlashCommand = serde_json::from_value(serde_json::json!({
            "trigger_id": "13345224609.738474920.8088930838d88f008e0",
            "command": "/version",
            "text": "",
            "user_id": "U1",
        }))
        .unwrap();

        assert_eq!(
            cmd.to_request(),
            Some(Request::Version {
                identifier: EventId("13345224609.738474920.8088930838d88f008e0".to_string()),
            })
        );
    }

    #[test]
    fn unknown_command_is_dropped() {
        let cmd: SlashCommand = serde_json::from_value(serde_json::json!({
            "trigger_id": "t-1",
            "command": "/weather",
        }))
        .unwrap();
        assert!(cmd.to_request().is_none());
    }
}
