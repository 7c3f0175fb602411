//! Structured logging setup.

use axum::extract::Request;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Header set by the request-id layer before the trace layer runs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &ObservabilityConfig) {
    let fallback = format!(
        "marknote={level},tower_http={level}",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Span wrapping one HTTP request, tagged with its request id.
pub fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::Registry;

    type Fields = Arc<Mutex<Vec<(String, String)>>>;

    /// Records the fields of every new span.
    struct SpanFields(Fields);

    struct Collect<'a>(&'a mut Vec<(String, String)>);

    impl Visit for Collect<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl<S: Subscriber> Layer<S> for SpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _: &Id, _: Context<'_, S>) {
            let mut fields = self.0.lock().unwrap();
            attrs.record(&mut Collect(&mut fields));
        }
    }

    fn span_fields(request: &Request) -> Vec<(String, String)> {
        let fields = Fields::default();
        let subscriber = Registry::default().with(SpanFields(fields.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let _span = request_span(request);
        });
        let recorded = fields.lock().unwrap().clone();
        recorded
    }

    fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_span_carries_request_id() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/text")
            .header(REQUEST_ID_HEADER, "5c1b6b8e-request")
            .body(Body::empty())
            .unwrap();

        let fields = span_fields(&request);
        assert_eq!(field(&fields, "request_id"), Some("5c1b6b8e-request"));
        assert_eq!(field(&fields, "method"), Some("POST"));
        assert_eq!(field(&fields, "uri"), Some("/text"));
    }

    #[test]
    fn test_span_without_request_id_uses_placeholder() {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let fields = span_fields(&request);
        assert_eq!(field(&fields, "request_id"), Some("-"));
    }
}
