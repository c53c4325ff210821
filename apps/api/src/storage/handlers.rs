use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeSummaryRow;
use crate::state::AppState;
use crate::storage::ResumeRecord;

#[derive(Debug, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub resume_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Option<Json<SaveRequest>>,
) -> Result<Json<SaveResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let record = state
        .sessions
        .with_session(session_id, |s| {
            Ok(ResumeRecord {
                id: s.resume_id,
                owner_id: s.owner_id,
                title: s.title.clone(),
                template_id: s.template.id.clone(),
                payload: s.payload(),
                is_published: req.is_published.unwrap_or(true),
            })
        })
        .await?;

    let updated_at = state.resumes.save(&record).await?;
    info!("Session {session_id} saved as resume {}", record.id);
    Ok(Json(SaveResponse {
        resume_id: record.id,
        updated_at,
    }))
}

/// GET /api/v1/resumes?owner_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<ResumeSummaryRow>>, AppError> {
    Ok(Json(state.resumes.list_for_owner(params.owner_id).await?))
}
