//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit, session)
//! - Bind server to listener
//! - Start the session sweeper alongside the server

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::ConfigIssue;
use crate::config::{CorsConfig, ServiceConfig};
use crate::grammar::{GrammarClient, UpstreamError};
use crate::http::handlers;
use crate::notes::NoteStore;
use crate::observability::{logging, metrics};
use crate::session::{
    session_middleware, spawn_sweeper, CookieSettings, MemorySessionStore, SessionLayerState,
    SessionStore,
};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteStore,
    pub grammar: GrammarClient,
}

/// Errors building the server from a configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("grammar client: {0}")]
    Grammar(#[from] UpstreamError),

    #[error("session: {0}")]
    Session(#[from] ConfigIssue),

    #[error("invalid CORS origin '{0}'")]
    CorsOrigin(String),
}

/// HTTP server for the notes service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    sessions: Arc<dyn SessionStore>,
}

impl HttpServer {
    /// Create a server backed by an in-memory session store.
    pub fn new(config: ServiceConfig) -> Result<Self, StartupError> {
        Self::with_store(config, Arc::new(MemorySessionStore::new()))
    }

    /// Create a server over the given session store.
    pub fn with_store(
        config: ServiceConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, StartupError> {
        let state = AppState {
            notes: NoteStore::new(sessions.clone()),
            grammar: GrammarClient::new(&config.grammar)?,
        };
        let session_state = SessionLayerState {
            store: sessions.clone(),
            cookies: Arc::new(CookieSettings::from_config(&config.session)?),
        };

        let router = Self::build_router(&config, state, session_state)?;
        Ok(Self {
            router,
            config,
            sessions,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &ServiceConfig,
        state: AppState,
        session_state: SessionLayerState,
    ) -> Result<Router, StartupError> {
        let router = Router::new()
            .route("/", get(handlers::health))
            .route("/text", get(handlers::list_notes).post(handlers::save_note))
            .route("/errorCheck", post(handlers::check_grammar))
            .route("/rendered", post(handlers::render))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .layer(middleware::from_fn_with_state(session_state, session_middleware))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(cors_layer(&config.cors)?)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(logging::request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Ok(router)
    }

    /// Run the server until `shutdown` fires or its sender is dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = spawn_sweeper(
            self.sessions.clone(),
            Duration::from_secs(self.config.session.sweep_interval_secs),
            Duration::from_secs(self.config.session.max_age_secs),
            shutdown.resubscribe(),
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        sweeper.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, StartupError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| StartupError::CorsOrigin(o.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
}
