// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notetron - a retrieval-augmented answering service for Slack.
//!
//! One process invocation handles one inbound event, mirroring the
//! hosting platform's delivery model: the platform retries events at
//! least once and possibly in parallel, and the idempotency gate in
//! `notetron-agent` makes redeliveries safe.

mod runtime;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use notetron_config::Config;
use notetron_core::{EventId, IngestionOutcome, MessageEvent, NotetronError, Request, ScopeKind};
use notetron_slack::MessageEnvelope;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::runtime::Runtime;

/// Notetron - a retrieval-augmented answering service for Slack.
#[derive(Parser, Debug)]
#[command(name = "notetron", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question delivered as a chat message.
    Ask {
        /// Author user id.
        #[arg(long)]
        user: String,
        /// Conversation the message arrived in.
        #[arg(long)]
        channel: String,
        /// Slack channel type; "im" marks a direct message.
        #[arg(long, default_value = "im")]
        channel_type: String,
        /// Deduplication identifier; omitted means a fresh event.
        #[arg(long)]
        identifier: Option<String>,
        /// Question text.
        text: String,
    },
    /// Process one Slack message event payload (JSON).
    Event {
        /// Event JSON as delivered by the Slack Events API.
        payload: String,
    },
    /// Answer the /version slash command.
    Version {
        /// Slash-command trigger id; omitted means a fresh invocation.
        #[arg(long)]
        trigger_id: Option<String>,
    },
    /// Ingest a document into the shared vector index.
    Ingest {
        /// Path to the document file.
        path: PathBuf,
    },
    /// Validate the configuration and print the resolved surface.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Fail fast before touching any event: every required configuration
    // group must be complete, each missing one reported by name.
    let config = match notetron_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            notetron_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(if config.service.verbose { "debug" } else { "info" });

    if let Err(err) = run(cli.command, config).await {
        error!(error = %err, "command failed");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: Config) -> Result<(), NotetronError> {
    match command {
        Commands::Ask {
            user,
            channel,
            channel_type,
            identifier,
            text,
        } => {
            let request = ask_request(user, channel, &channel_type, identifier, text);
            answer_request(&config, &request).await
        }
        Commands::Event { payload } => match parse_event(&payload)? {
            Some(request) => answer_request(&config, &request).await,
            None => {
                info!("event filtered, nothing to answer");
                Ok(())
            }
        },
        Commands::Version { trigger_id } => {
            let request = Request::Version {
                identifier: EventId(trigger_id.unwrap_or_else(fresh_identifier)),
            };
            answer_request(&config, &request).await
        }
        Commands::Ingest { path } => {
            let runtime = Runtime::from_config(&config).await?;
            let result = ingest_file(&runtime, &path).await;
            if let Err(err) = runtime.close().await {
                warn!(error = %err, "database close failed");
            }
            result
        }
        Commands::Config => {
            print_config(&config);
            Ok(())
        }
    }
}

/// Builds the runtime, processes one request, and prints the reply.
/// A duplicate delivery with nothing to repeat stays silent.
async fn answer_request(config: &Config, request: &Request) -> Result<(), NotetronError> {
    let runtime = Runtime::from_config(config).await?;
    let reply = runtime.process(request).await;
    if let Err(err) = runtime.close().await {
        warn!(error = %err, "database close failed");
    }
    match reply? {
        Some(answer) => println!("{answer}"),
        None => debug!("duplicate delivery, staying silent"),
    }
    Ok(())
}

/// Builds a message request from command-line arguments.
fn ask_request(
    user: String,
    channel: String,
    channel_type: &str,
    identifier: Option<String>,
    text: String,
) -> Request {
    let scope_kind = if channel_type == "im" {
        ScopeKind::Direct
    } else {
        ScopeKind::Group
    };
    Request::Answer(MessageEvent {
        identifier: EventId(identifier.unwrap_or_else(fresh_identifier)),
        user_id: user,
        scope_id: channel,
        scope_kind,
        text,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Parses a Slack message event payload into a typed request.
/// `Ok(None)` means the event was filtered, not malformed.
fn parse_event(payload: &str) -> Result<Option<Request>, NotetronError> {
    let envelope: MessageEnvelope = serde_json::from_str(payload)
        .map_err(|err| NotetronError::Internal(format!("invalid event payload: {err}")))?;
    Ok(envelope.to_request())
}

fn fresh_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Reads the file and offers it to the ingestion pipeline.
async fn ingest_file(runtime: &Runtime, path: &Path) -> Result<(), NotetronError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        NotetronError::Internal(format!("failed to read {}: {err}", path.display()))
    })?;
    let source_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    match runtime.ingest(&bytes, source_name, extension).await? {
        IngestionOutcome::Completed(summary) => {
            println!(
                "ingested {source_name}: {} pages, {} chunks, {} embedded",
                summary.pages, summary.chunks, summary.embedded
            );
        }
        IngestionOutcome::Skipped => {
            println!("skipped {}: only pdf documents are ingested", path.display());
        }
    }
    Ok(())
}

/// Prints the resolved configuration with secrets redacted.
fn print_config(config: &Config) {
    println!("configuration ok");
    println!(
        "  service: name={} phase={} version={} verbose={}",
        config.service.name, config.service.phase, config.service.version, config.service.verbose
    );
    println!(
        "  openai: chat_model={} embedding_model={}",
        config.openai.chat_model, config.openai.embedding_model
    );
    println!(
        "  qdrant: url={} collection={}",
        config.qdrant.url, config.qdrant.collection
    );
    println!(
        "  langfuse: base_url={} prompt={}",
        config.langfuse.base_url, config.langfuse.prompt_name
    );
    println!("  history: path={}", config.history.path);
    println!("  slack: signing secret and bot token set");
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notetron={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_maps_im_to_direct_scope() {
        let request = ask_request(
            "U1".to_string(),
            "D1".to_string(),
            "im",
            Some("m1".to_string()),
            "hello".to_string(),
        );
        let Request::Answer(event) = request else {
            panic!("expected an answer request");
        };
        assert_eq!(event.scope_kind, ScopeKind::Direct);
        assert_eq!(event.owner_key(), "U1");
        assert_eq!(event.identifier.0, "m1");
    }

    #[test]
    fn ask_maps_channels_to_group_scope() {
        let request = ask_request(
            "U1".to_string(),
            "C9".to_string(),
            "channel",
            None,
            "hello".to_string(),
        );
        let Request::Answer(event) = request else {
            panic!("expected an answer request");
        };
        assert_eq!(event.scope_kind, ScopeKind::Group);
        assert_eq!(event.owner_key(), "C9");
        // Fresh identifier when none is supplied.
        assert!(!event.identifier.0.is_empty());
    }

    #[test]
    fn event_payload_parses_and_filters() {
        let answered = parse_event(
            r#"{"client_msg_id":"m1","user":"U1","channel":"D1","channel_type":"im","text":"hi","ts":"1726000000.000500"}"#,
        )
        .unwrap();
        assert!(answered.is_some());

        let filtered = parse_event(
            r#"{"client_msg_id":"m2","user":"U1","channel":"C9","subtype":"channel_join","text":"joined","ts":"1726000001.000500"}"#,
        )
        .unwrap();
        assert!(filtered.is_none());

        assert!(parse_event("not json").is_err());
    }
}
