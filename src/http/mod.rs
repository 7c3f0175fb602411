//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → session layer (resolve SessionId)
//!     → request.rs (validate the `text` payload)
//!     → handlers.rs (notes / grammar proxy / renderer)
//!     → response.rs (map failures to status codes and bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{extract_text, TextPayload, ValidationError};
pub use response::AppError;
pub use server::{AppState, HttpServer, StartupError};
