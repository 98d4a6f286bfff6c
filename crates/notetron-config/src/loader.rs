// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! The deployed surface is environment-first: `NOTETRON_*` variables
//! override an optional local `notetron.toml`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RawConfig;

/// Load configuration from the local file with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `./notetron.toml` (local directory)
/// 3. `NOTETRON_*` environment variables
pub fn load_config() -> Result<RawConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RawConfig::default()))
        .merge(Toml::file("notetron.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RawConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RawConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `NOTETRON_SLACK_SIGNING_SECRET` must
/// map to `slack.signing_secret`, not `slack.signing.secret`.
fn env_provider() -> Env {
    Env::prefixed("NOTETRON_").map(|key| map_env_key(key.as_str()).into())
}

/// Rewrite a prefix-stripped, lowercased env key into its `section.key` form.
fn map_env_key(key: &str) -> String {
    key.replacen("slack_", "slack.", 1)
        .replacen("openai_", "openai.", 1)
        .replacen("qdrant_", "qdrant.", 1)
        .replacen("langfuse_", "langfuse.", 1)
        .replacen("history_", "history.", 1)
        .replacen("service_", "service.", 1)
}
