// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Each required configuration group gets its own named error so an
//! operator can tell at a glance which collaborator is missing its
//! settings. Rendering uses miette's graphical report handler.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error raised during startup validation.
///
/// Startup fails fast on any of these, before a single event is accepted.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The chat-platform group is missing one of its required keys.
    #[error("slack configuration incomplete")]
    #[diagnostic(
        code(notetron::config::slack),
        help("set NOTETRON_SLACK_SIGNING_SECRET and NOTETRON_SLACK_BOT_TOKEN")
    )]
    SlackIncomplete,

    /// The language-model group is missing its API key.
    #[error("OpenAI configuration incomplete")]
    #[diagnostic(code(notetron::config::openai), help("set NOTETRON_OPENAI_API_KEY"))]
    OpenAiIncomplete,

    /// The vector-store group is missing one of its required keys.
    #[error("qdrant configuration incomplete")]
    #[diagnostic(
        code(notetron::config::qdrant),
        help("set NOTETRON_QDRANT_URL, NOTETRON_QDRANT_API_KEY and NOTETRON_QDRANT_COLLECTION")
    )]
    QdrantIncomplete,

    /// The tracing/template-store group is missing one of its required keys.
    #[error("missing langfuse configuration")]
    #[diagnostic(
        code(notetron::config::langfuse),
        help("set NOTETRON_LANGFUSE_PUBLIC_KEY, NOTETRON_LANGFUSE_SECRET_KEY and NOTETRON_LANGFUSE_BASE_URL")
    )]
    LangfuseIncomplete,

    /// The history-store group is missing its database location.
    #[error("history store configuration incomplete")]
    #[diagnostic(code(notetron::config::history), help("set NOTETRON_HISTORY_PATH"))]
    HistoryIncomplete,

    /// The service group is missing its build phase or version string.
    #[error("service configuration incomplete")]
    #[diagnostic(
        code(notetron::config::service),
        help("set NOTETRON_SERVICE_PHASE (integer) and NOTETRON_SERVICE_VERSION")
    )]
    ServiceIncomplete,

    /// A semantic constraint on a present value failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(notetron::config::validation))]
    Validation { message: String },

    /// Catch-all for deserialization and other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(notetron::config::other))]
    Other(String),
}

/// Render all errors to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
