use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::document::{Document, Mutation, MutationOutcome};
use crate::errors::AppError;
use crate::projection::{render_markdown, RenderTree, ResumePayload, TemplateDescriptor};
use crate::session::{EditingSession, SessionView, DEFAULT_RESUME_TITLE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub owner_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadSessionRequest {
    pub owner_id: Uuid,
    pub resume_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

fn resolve_template(state: &AppState, id: &str) -> Result<TemplateDescriptor, AppError> {
    state
        .templates
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::Validation(format!("Unknown template '{id}'")))
}

fn clean_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title must not be blank".to_string()));
    }
    Ok(title.to_string())
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateDescriptor>> {
    Json(state.templates.all().to_vec())
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let template = match req.template_id.as_deref() {
        Some(id) => resolve_template(&state, id)?,
        None => TemplateDescriptor::default(),
    };
    let title = match req.title.as_deref() {
        Some(title) => clean_title(title)?,
        None => DEFAULT_RESUME_TITLE.to_string(),
    };
    let session = EditingSession::new(req.owner_id, Uuid::new_v4(), title, template, Document::new());
    let view = state.sessions.open(session).await;
    info!("Opened session {} for user {}", view.session_id, view.owner_id);
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /api/v1/sessions/load
pub async fn handle_load_session(
    State(state): State<AppState>,
    Json(req): Json<LoadSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let row = state
        .resumes
        .load(req.owner_id, req.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?;

    let template = state.templates.get_or_default(Some(&row.template_id));
    let document = Document::from_payload(row.payload.0)?;
    let session = EditingSession::new(row.user_id, row.id, row.title, template, document);
    let view = state.sessions.open(session).await;
    info!("Opened session {} on stored resume {}", view.session_id, view.resume_id);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(session_id, |s| Ok(s.view()))
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(session_id).await?;
    info!("Closed session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/mutations
pub async fn handle_apply_mutation(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(mutation): Json<Mutation>,
) -> Result<Json<MutationOutcome>, AppError> {
    let outcome = state
        .sessions
        .with_session(session_id, |s| Ok(s.document.apply(mutation)?))
        .await?;
    Ok(Json(outcome))
}

/// PUT /api/v1/sessions/:id/template
///
/// Changes presentation only; the document is not touched.
pub async fn handle_set_template(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let template = resolve_template(&state, &req.template_id)?;
    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.template = template;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/title
pub async fn handle_set_title(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<SessionView>, AppError> {
    let title = clean_title(&req.title)?;
    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.title = title;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RenderTree>, AppError> {
    let tree = state
        .sessions
        .with_session(session_id, |s| Ok(s.render_tree()))
        .await?;
    Ok(Json(tree))
}

/// GET /api/v1/sessions/:id/preview/markdown
pub async fn handle_preview_markdown(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let markdown = state
        .sessions
        .with_session(session_id, |s| Ok(render_markdown(&s.render_tree())))
        .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}

/// GET /api/v1/sessions/:id/payload
pub async fn handle_payload(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumePayload>, AppError> {
    let payload = state
        .sessions
        .with_session(session_id, |s| Ok(s.payload()))
        .await?;
    Ok(Json(payload))
}
