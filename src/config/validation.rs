//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All issues are collected, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{SameSitePolicy, ServiceConfig};

/// Minimum secret length accepted by the cookie key derivation.
pub const MIN_SECRET_LEN: usize = 32;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("session.secret is not set (export SESSION_SECRET)")]
    MissingSecret,

    #[error("session.secret must be at least {} bytes", MIN_SECRET_LEN)]
    SecretTooShort,

    #[error("session.cookie_name must not be empty")]
    EmptyCookieName,

    #[error("session.max_age_secs must be greater than zero")]
    ZeroMaxAge,

    #[error("session.sweep_interval_secs must be greater than zero")]
    ZeroSweepInterval,

    #[error("session.same_site = \"none\" requires session.secure = true")]
    InsecureSameSiteNone,

    #[error("cors origin '{0}' is not a valid origin")]
    CorsOrigin(String),

    #[error("grammar.url '{0}' is not an http(s) URL")]
    GrammarUrl(String),

    #[error("grammar.language must not be empty")]
    EmptyLanguage,

    #[error(
        "grammar.timeout_secs ({grammar}) must be below timeouts.request_secs ({request})"
    )]
    GrammarTimeoutTooLong { grammar: u64, request: u64 },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every issue found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        issues.push(ConfigIssue::BindAddress(config.listener.bind_address.clone()));
    }

    let session = &config.session;
    if session.secret.is_empty() {
        issues.push(ConfigIssue::MissingSecret);
    } else if session.secret.len() < MIN_SECRET_LEN {
        issues.push(ConfigIssue::SecretTooShort);
    }
    if session.cookie_name.trim().is_empty() {
        issues.push(ConfigIssue::EmptyCookieName);
    }
    if session.max_age_secs == 0 {
        issues.push(ConfigIssue::ZeroMaxAge);
    }
    if session.sweep_interval_secs == 0 {
        issues.push(ConfigIssue::ZeroSweepInterval);
    }
    // Browsers drop SameSite=None cookies without Secure.
    if session.same_site == SameSitePolicy::None && !session.secure {
        issues.push(ConfigIssue::InsecureSameSiteNone);
    }

    for origin in &config.cors.allowed_origins {
        let valid = url::Url::parse(origin)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !valid {
            issues.push(ConfigIssue::CorsOrigin(origin.clone()));
        }
    }

    match url::Url::parse(&config.grammar.url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => {}
        _ => issues.push(ConfigIssue::GrammarUrl(config.grammar.url.clone())),
    }
    if config.grammar.language.trim().is_empty() {
        issues.push(ConfigIssue::EmptyLanguage);
    }
    if config.grammar.timeout_secs == 0 {
        issues.push(ConfigIssue::ZeroValue("grammar.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        issues.push(ConfigIssue::ZeroValue("timeouts.request_secs"));
    }
    // Upstream timeouts must fire before the outer 408.
    if config.grammar.timeout_secs >= config.timeouts.request_secs {
        issues.push(ConfigIssue::GrammarTimeoutTooLong {
            grammar: config.grammar.timeout_secs,
            request: config.timeouts.request_secs,
        });
    }
    if config.security.max_body_size == 0 {
        issues.push(ConfigIssue::ZeroValue("security.max_body_size"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        issues.push(ConfigIssue::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
