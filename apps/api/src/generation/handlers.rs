use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::document::{Content, DocumentError, SectionId, SectionKind, TextContent};
use crate::errors::AppError;
use crate::generation::{accepts_generated_text, default_hint};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub section_id: SectionId,
    #[serde(default)]
    pub context_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub section_id: SectionId,
    pub text: String,
}

fn text_content(kind: SectionKind, text: String) -> Content {
    match kind {
        SectionKind::Custom => Content::Custom(TextContent { text }),
        _ => Content::Summary(TextContent { text }),
    }
}

/// POST /api/v1/sessions/:id/generate
///
/// The provider call runs outside the session lock; its text is applied
/// afterwards, so a failed call leaves the document untouched.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let kind = state
        .sessions
        .with_session(session_id, |s| {
            let section = s
                .document
                .section(&req.section_id)
                .ok_or_else(|| DocumentError::SectionNotFound(req.section_id.clone()))?;
            Ok(section.kind)
        })
        .await?;
    if !accepts_generated_text(kind) {
        return Err(AppError::Validation(format!(
            "Text generation is not available for '{kind}' sections"
        )));
    }

    let hint = req
        .context_hint
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(default_hint(kind));
    let text = state.generator.generate(kind, hint).await?;

    state
        .sessions
        .with_session(session_id, |s| {
            Ok(s.document
                .set_section_content(&req.section_id, text_content(kind, text.clone()))?)
        })
        .await?;
    info!("Session {session_id} section {} filled with generated text", req.section_id);

    Ok(Json(GenerateResponse {
        section_id: req.section_id,
        text,
    }))
}
