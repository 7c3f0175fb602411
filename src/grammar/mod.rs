//! Grammar check proxy.
//!
//! Forwards text to a LanguageTool-compatible `/v2/check` endpoint and
//! relays its `matches` untouched. Failures are never retried or cached.

pub mod client;

pub use client::{CheckOutcome, GrammarClient, UpstreamError};
