// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Required-group validation.
//!
//! Mirrors the startup check of the deployed service: each collaborator's
//! settings form one group, and an incomplete group produces one named
//! error. All groups are checked before reporting (does not fail fast
//! within validation), so one run shows everything that is missing.

use crate::diagnostic::ConfigError;
use crate::model::{
    Config, HistoryConfig, LangfuseConfig, OpenAiConfig, QdrantConfig, RawConfig, ServiceConfig,
    SlackConfig,
};

/// Validate a deserialized configuration, producing the typed `Config`.
///
/// Returns every collected error; startup renders them all and exits.
pub fn validate(raw: RawConfig) -> Result<Config, Vec<ConfigError>> {
    let mut errors = Vec::new();

    let slack = match (&raw.slack.signing_secret, &raw.slack.bot_token) {
        (Some(secret), Some(token)) if present(secret) && present(token) => Some(SlackConfig {
            signing_secret: secret.clone(),
            bot_token: token.clone(),
        }),
        _ => {
            errors.push(ConfigError::SlackIncomplete);
            None
        }
    };

    let openai = match &raw.openai.api_key {
        Some(key) if present(key) => Some(OpenAiConfig {
            api_key: key.clone(),
            chat_model: raw.openai.chat_model.clone(),
            embedding_model: raw.openai.embedding_model.clone(),
        }),
        _ => {
            errors.push(ConfigError::OpenAiIncomplete);
            None
        }
    };

    let qdrant = match (&raw.qdrant.url, &raw.qdrant.api_key, &raw.qdrant.collection) {
        (Some(url), Some(key), Some(collection))
            if present(url) && present(key) && present(collection) =>
        {
            Some(QdrantConfig {
                url: url.trim_end_matches('/').to_string(),
                api_key: key.clone(),
                collection: collection.clone(),
            })
        }
        _ => {
            errors.push(ConfigError::QdrantIncomplete);
            None
        }
    };

    let langfuse = match (
        &raw.langfuse.public_key,
        &raw.langfuse.secret_key,
        &raw.langfuse.base_url,
    ) {
        (Some(public), Some(secret), Some(base)) if present(public) && present(secret) && present(base) => {
            Some(LangfuseConfig {
                public_key: public.clone(),
                secret_key: secret.clone(),
                base_url: base.trim_end_matches('/').to_string(),
                prompt_name: raw.langfuse.prompt_name.clone(),
            })
        }
        _ => {
            errors.push(ConfigError::LangfuseIncomplete);
            None
        }
    };

    let history = match &raw.history.path {
        Some(path) if present(path) => Some(HistoryConfig { path: path.clone() }),
        _ => {
            errors.push(ConfigError::HistoryIncomplete);
            None
        }
    };

    let service = match (&raw.service.phase, &raw.service.version) {
        (Some(phase), Some(version)) if present(version) => Some(ServiceConfig {
            phase: *phase,
            // The flag is a string in the environment; only the exact
            // value "TRUE" enables verbose logging.
            verbose: raw.service.verbose.as_deref() == Some("TRUE"),
            version: version.clone(),
            name: raw.service.name.clone(),
        }),
        _ => {
            errors.push(ConfigError::ServiceIncomplete);
            None
        }
    };

    if raw.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    match (slack, openai, qdrant, langfuse, history, service) {
        (Some(slack), Some(openai), Some(qdrant), Some(langfuse), Some(history), Some(service))
            if errors.is_empty() =>
        {
            Ok(Config {
                slack,
                openai,
                qdrant,
                langfuse,
                history,
                service,
            })
        }
        _ => Err(errors),
    }
}

/// A required string key counts only when non-empty after trimming.
fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const FULL: &str = r#"
        [slack]
        signing_secret = "ss"
        bot_token = "xoxb-1"

        [openai]
        api_key = "sk-1"

        [qdrant]
        url = "http://localhost:6333/"
        api_key = "qk"
        collection = "notes"

        [langfuse]
        public_key = "pk"
        secret_key = "sk"
        base_url = "https://cloud.langfuse.example"

        [history]
        path = "/var/lib/notetron/history.db"

        [service]
        phase = 2
        version = "1.4.0"
    "#;

    fn raw(toml: &str) -> RawConfig {
        load_config_from_str(toml).unwrap()
    }

    #[test]
    fn full_config_validates() {
        let config = validate(raw(FULL)).unwrap();
        assert_eq!(config.slack.bot_token, "xoxb-1");
        assert_eq!(config.openai.chat_model, "gpt-3.5-turbo");
        // Trailing slash is normalized away so URL joins stay clean.
        assert_eq!(config.qdrant.url, "http://localhost:6333");
        assert_eq!(config.langfuse.prompt_name, "notetron");
        assert_eq!(config.service.phase, 2);
        assert_eq!(config.service.name, "Notetron");
        assert!(!config.service.verbose);
    }

    #[test]
    fn verbose_requires_exact_true() {
        let mut cfg = raw(FULL);
        cfg.service.verbose = Some("TRUE".into());
        assert!(validate(cfg).unwrap().service.verbose);

        let mut cfg = raw(FULL);
        cfg.service.verbose = Some("true".into());
        assert!(!validate(cfg).unwrap().service.verbose);
    }

    #[test]
    fn each_missing_group_is_named_once() {
        let errors = validate(raw("")).unwrap_err();
        assert_eq!(errors.len(), 6);
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(rendered.contains(&"slack configuration incomplete".to_string()));
        assert!(rendered.contains(&"OpenAI configuration incomplete".to_string()));
        assert!(rendered.contains(&"qdrant configuration incomplete".to_string()));
        assert!(rendered.contains(&"missing langfuse configuration".to_string()));
        assert!(rendered.contains(&"history store configuration incomplete".to_string()));
        assert!(rendered.contains(&"service configuration incomplete".to_string()));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let mut cfg = raw(FULL);
        cfg.openai.api_key = Some("   ".into());
        let errors = validate(cfg).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ConfigError::OpenAiIncomplete));
    }

    #[test]
    fn partial_group_is_incomplete() {
        let mut cfg = raw(FULL);
        cfg.qdrant.collection = None;
        let errors = validate(cfg).unwrap_err();
        assert!(matches!(errors[0], ConfigError::QdrantIncomplete));
    }
}
