//! Markdown to HTML rendering.
//!
//! The ruleset is fixed: CommonMark plus GFM tables, strikethrough and task
//! lists. Output is not sanitized.

use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

use crate::observability::metrics;

/// Rendering failure. Partial output is never returned.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write HTML output")]
    Format(#[from] std::fmt::Error),

    #[error("renderer aborted: {0}")]
    Aborted(String),
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render `source` to HTML.
pub fn render_markdown(source: &str) -> Result<String, RenderError> {
    let parser = Parser::new_ext(source, options());
    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::write_html_fmt(&mut out, parser)?;
    Ok(out)
}

/// Render on the blocking pool so large documents don't stall the runtime.
pub async fn render_markdown_blocking(source: String) -> Result<String, RenderError> {
    let result = tokio::task::spawn_blocking(move || render_markdown(&source))
        .await
        .map_err(|e| RenderError::Aborted(e.to_string()))
        .and_then(|inner| inner);

    if result.is_err() {
        metrics::record_render_failure();
    }
    result
}
