//! Session notes, grammar checking and Markdown rendering over HTTP.

pub mod config;
pub mod grammar;
pub mod http;
pub mod lifecycle;
pub mod notes;
pub mod observability;
pub mod render;
pub mod session;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
