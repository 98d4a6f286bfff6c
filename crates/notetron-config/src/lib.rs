// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Notetron answering service.
//!
//! Provides environment-first configuration (`NOTETRON_*` variables over an
//! optional local `notetron.toml`), strict parsing (`deny_unknown_fields`),
//! and per-group validation: every external collaborator's settings form a
//! required group with its own named diagnostic, and startup fails fast when
//! any group is incomplete.
//!
//! # Usage
//!
//! ```no_run
//! use notetron_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("service version: {}", config.service.version);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_str};
pub use model::{
    Config, HistoryConfig, LangfuseConfig, OpenAiConfig, QdrantConfig, RawConfig, ServiceConfig,
    SlackConfig,
};

/// Load configuration from file + environment and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config via Figment (defaults, `notetron.toml`, `NOTETRON_*` env)
/// 2. On success: runs required-group validation
/// 3. On Figment error: converts each error into a diagnostic
///
/// Returns either a fully-typed `Config` or the list of diagnostics.
pub fn load_and_validate() -> Result<Config, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(raw) => validation::validate(raw),
        Err(err) => Err(err
            .into_iter()
            .map(|e| ConfigError::Other(e.to_string()))
            .collect()),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<Config, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(raw) => validation::validate(raw),
        Err(err) => Err(err
            .into_iter()
            .map(|e| ConfigError::Other(e.to_string()))
            .collect()),
    }
}
