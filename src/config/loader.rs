//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply process
/// environment overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay deployment-specific values from the environment.
///
/// Recognized keys: `PORT`, `SESSION_SECRET` (or the older `SESSIONSECRET`),
/// `COOKIE_DOMAIN`, `GRAMMAR_URL`.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(secret) = lookup("SESSION_SECRET").or_else(|| lookup("SESSIONSECRET")) {
        config.session.secret = secret;
    }
    if let Some(domain) = lookup("COOKIE_DOMAIN").filter(|d| !d.is_empty()) {
        config.session.domain = Some(domain);
    }
    if let Some(url) = lookup("GRAMMAR_URL") {
        config.grammar.url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef-prod"),
            ("COOKIE_DOMAIN", ".onrender.com"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.session.secret, "0123456789abcdef0123456789abcdef-prod");
        assert_eq!(config.session.domain.as_deref(), Some(".onrender.com"));
        assert_eq!(config.grammar.url, ServiceConfig::default().grammar.url);
    }

    #[test]
    fn test_legacy_secret_variable_is_honored() {
        let legacy = "legacy-secret-legacy-secret-legacy-secret";
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |k| (k == "SESSIONSECRET").then(|| legacy.to_string()));
        assert_eq!(config.session.secret, legacy);

        let env: HashMap<&str, &str> =
            [("SESSION_SECRET", "current"), ("SESSIONSECRET", "legacy")].into_iter().collect();
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.session.secret, "current");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |k| (k == "PORT").then(|| "http".to_string()));
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("does-not-exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
