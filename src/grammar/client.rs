//! HTTP client for the external grammar checker.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::GrammarConfig;
use crate::observability::metrics;

/// Errors talking to the grammar checker.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Configured endpoint is not a usable URL.
    #[error("invalid grammar endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Connection or protocol failure.
    #[error("grammar service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// No answer within the configured timeout.
    #[error("grammar service timed out after {0} seconds")]
    Timeout(u64),

    /// Non-2xx answer.
    #[error("grammar service returned status {0}")]
    Status(StatusCode),

    /// 2xx answer without a `matches` array.
    #[error("grammar service returned a malformed response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidEndpoint(_) => "invalid_endpoint",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Status(_) => "status",
            UpstreamError::Malformed(_) => "malformed",
        }
    }
}

/// Result of a check: the upstream matches plus the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub errors: Vec<serde_json::Value>,
    pub text: String,
}

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<serde_json::Value>,
}

/// Client for a LanguageTool-compatible check endpoint.
#[derive(Clone)]
pub struct GrammarClient {
    http: reqwest::Client,
    endpoint: Url,
    language: String,
    timeout_secs: u64,
}

impl GrammarClient {
    pub fn new(config: &GrammarConfig) -> Result<Self, UpstreamError> {
        let endpoint = Url::parse(&config.url)
            .map_err(|_| UpstreamError::InvalidEndpoint(config.url.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            http,
            endpoint,
            language: config.language.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Check `text`, returning the upstream matches verbatim.
    pub async fn check(&self, text: String) -> Result<CheckOutcome, UpstreamError> {
        let result = self.send(&text).await;
        match result {
            Ok(errors) => Ok(CheckOutcome { errors, text }),
            Err(e) => {
                metrics::record_upstream_failure(e.kind());
                Err(e)
            }
        }
    }

    async fn send(&self, text: &str) -> Result<Vec<serde_json::Value>, UpstreamError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body: CheckResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                UpstreamError::Malformed(e.to_string())
            } else {
                self.classify(e)
            }
        })?;

        tracing::debug!(matches = body.matches.len(), "Grammar check completed");
        Ok(body.matches)
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Transport(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_endpoint() {
        let config = GrammarConfig {
            url: "::not a url::".into(),
            ..GrammarConfig::default()
        };
        assert!(matches!(
            GrammarClient::new(&config),
            Err(UpstreamError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let closed = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let config = GrammarConfig {
            url: format!("http://{closed}/v2/check"),
            timeout_secs: 2,
            ..GrammarConfig::default()
        };
        let client = GrammarClient::new(&config).unwrap();

        let err = client.check("text".into()).await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Transport(_) | UpstreamError::Timeout(_)
        ));
    }

    #[test]
    fn test_outcome_serializes_as_errors_and_text() {
        let outcome = CheckOutcome {
            errors: vec![serde_json::json!({"message": "typo", "offset": 0})],
            text: "teh".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errors": [{"message": "typo", "offset": 0}], "text": "teh"})
        );
    }
}
