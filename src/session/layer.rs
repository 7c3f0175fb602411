//! Session cookie middleware.
//!
//! Resolves the signed session cookie to a [`SessionId`] and makes it
//! available to handlers as a request extension. Unknown, unsigned or
//! tampered ids are replaced by a freshly minted one. A `Set-Cookie` is
//! only emitted once the new session has actually been written to the
//! store, so read-only clients never receive a cookie.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use cookie::{Cookie, CookieJar, Key, SameSite};
use std::sync::Arc;

use crate::config::validation::{ConfigIssue, MIN_SECRET_LEN};
use crate::config::{SameSitePolicy, SessionConfig};
use crate::session::store::{SessionId, SessionStore};

/// Cookie attributes and signing key.
pub struct CookieSettings {
    name: String,
    key: Key,
    max_age_secs: u64,
    secure: bool,
    same_site: SameSite,
    domain: Option<String>,
}

impl CookieSettings {
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigIssue> {
        if config.secret.is_empty() {
            return Err(ConfigIssue::MissingSecret);
        }
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigIssue::SecretTooShort);
        }

        Ok(Self {
            name: config.cookie_name.clone(),
            key: Key::derive_from(config.secret.as_bytes()),
            max_age_secs: config.max_age_secs,
            secure: config.secure,
            same_site: match config.same_site {
                SameSitePolicy::Strict => SameSite::Strict,
                SameSitePolicy::Lax => SameSite::Lax,
                SameSitePolicy::None => SameSite::None,
            },
            domain: config.domain.clone(),
        })
    }

    /// Verified session id from the request cookies, if present.
    fn session_from(&self, headers: &HeaderMap) -> Option<SessionId> {
        let mut jar = CookieJar::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            for cookie in Cookie::split_parse(raw).flatten() {
                jar.add_original(cookie.into_owned());
            }
        }

        jar.signed(&self.key)
            .get(&self.name)
            .and_then(|c| c.value().parse().ok())
    }

    /// Signed `Set-Cookie` value for `id`.
    fn set_cookie(&self, id: SessionId) -> Option<HeaderValue> {
        let max_age = i64::try_from(self.max_age_secs).unwrap_or(i64::MAX);
        let mut builder = Cookie::build((self.name.clone(), id.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(cookie::time::Duration::seconds(max_age));
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(builder);
        let cookie = jar.delta().next()?;
        HeaderValue::from_str(&cookie.to_string()).ok()
    }
}

/// State for the session middleware.
#[derive(Clone)]
pub struct SessionLayerState {
    pub store: Arc<dyn SessionStore>,
    pub cookies: Arc<CookieSettings>,
}

/// Attach a [`SessionId`] to every request.
pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let presented = state
        .cookies
        .session_from(request.headers())
        .filter(|id| state.store.contains(id));

    let (id, issued) = match presented {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if issued && state.store.contains(&id) {
        match state.cookies.set_cookie(id) {
            Some(value) => {
                tracing::debug!(session = %id, "Session initialized");
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::error!(session = %id, "Failed to encode session cookie"),
        }
    }

    response
}
