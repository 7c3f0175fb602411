//! Endpoint handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::Serialize;

use crate::grammar::CheckOutcome;
use crate::http::request::TextPayload;
use crate::http::response::AppError;
use crate::http::server::AppState;
use crate::notes::Note;
use crate::render::render_markdown_blocking;
use crate::session::SessionId;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SavedNote {
    pub message: &'static str,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct NoteList {
    pub notes: Vec<Note>,
}

/// `GET /`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "Server is healthy",
    })
}

/// `POST /text`
pub async fn save_note(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    TextPayload(text): TextPayload,
) -> (StatusCode, Json<SavedNote>) {
    let note = state.notes.append(&session, text);
    (
        StatusCode::CREATED,
        Json(SavedNote {
            message: "Text saved",
            data: note.body,
        }),
    )
}

/// `GET /text`
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Json<NoteList> {
    Json(NoteList {
        notes: state.notes.list(&session),
    })
}

/// `POST /errorCheck`
pub async fn check_grammar(
    State(state): State<AppState>,
    TextPayload(text): TextPayload,
) -> Result<Json<CheckOutcome>, AppError> {
    let outcome = state.grammar.check(text).await?;
    Ok(Json(outcome))
}

/// `POST /rendered`
pub async fn render(TextPayload(text): TextPayload) -> Result<Html<String>, AppError> {
    let html = render_markdown_blocking(text).await?;
    Ok(Html(html))
}
