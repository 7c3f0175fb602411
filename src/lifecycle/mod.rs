//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind listener → Serve
//!
//! Shutdown:
//!     Ctrl+C / SIGTERM or Shutdown::trigger → stop accepting → drain in-flight requests
//!     → sweeper exits → process exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
