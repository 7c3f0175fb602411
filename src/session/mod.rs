//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → layer.rs (verify signature, resolve SessionId or mint a new one)
//!     → handlers (NoteStore reads/writes through store.rs)
//!     → layer.rs (emit Set-Cookie once the session exists)
//!
//! Background:
//!     sweeper.rs → store.rs (purge idle sessions)
//! ```
//!
//! # Design Decisions
//! - Session ids are random and server-issued; client-chosen ids are never adopted
//! - No record is created until the first write
//! - Per-session writes are serialized by the store

pub mod layer;
pub mod store;
pub mod sweeper;

pub use layer::{session_middleware, CookieSettings, SessionLayerState};
pub use store::{MemorySessionStore, SessionId, SessionRecord, SessionStore};
pub use sweeper::spawn_sweeper;
