use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_filename, ExportJob, ExportRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExportAccepted {
    pub job_id: Uuid,
    pub filename: String,
}

/// POST /api/v1/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Option<Json<ExportRequest>>,
) -> Result<(StatusCode, Json<ExportAccepted>), AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let job = state
        .sessions
        .with_session(session_id, |s| {
            Ok(ExportJob {
                job_id: Uuid::new_v4(),
                filename: export_filename(req.filename.as_deref(), &s.title),
                render_tree: s.render_tree(),
                requested_at: Utc::now(),
            })
        })
        .await?;

    state.exports.enqueue(&job).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ExportAccepted {
            job_id: job.job_id,
            filename: job.filename,
        }),
    ))
}
