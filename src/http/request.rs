//! Request payload validation.
//!
//! Every body-carrying endpoint requires a string `text` field. Bodies are
//! accepted as JSON or URL-encoded forms; anything else (wrong content type,
//! unparseable body, non-object payload) counts as a missing field.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http::response::AppError;

/// The payload lacked a string `text` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text field is required and must be a string")]
    MissingOrWrongType,
}

/// Return the payload's `text` field if it is a string.
pub fn extract_text(payload: &Value) -> Result<String, ValidationError> {
    payload
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(ValidationError::MissingOrWrongType)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        else {
            return BodyKind::Other;
        };

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }

    fn decode(self, body: &[u8]) -> Value {
        match self {
            BodyKind::Json => serde_json::from_slice(body).unwrap_or(Value::Null),
            BodyKind::Form => decode_form(body),
            BodyKind::Other => Value::Null,
        }
    }
}

/// Repeated keys become arrays, so `text=a&text=b` is not a string.
fn decode_form(body: &[u8]) -> Value {
    let mut fields = Map::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        let value = Value::String(value.into_owned());
        match fields.get_mut(&*key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                fields.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(fields)
}

/// Extractor yielding the validated `text` field.
///
/// Must be the last extractor of a handler since it consumes the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload(pub String);

impl<S> FromRequest<S> for TextPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::from_headers(req.headers());
        let body = Bytes::from_request(req, state).await?;
        let text = extract_text(&kind.decode(&body))?;
        Ok(Self(text))
    }
}
