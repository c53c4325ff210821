pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::storage::handlers as storage;
use crate::uploads::handlers as uploads;

/// Allowance for multipart framing on top of the photo byte limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let photo_body_limit = state.config.max_photo_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(session::handle_list_templates))
        // Editing sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/load", post(session::handle_load_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/mutations",
            post(session::handle_apply_mutation),
        )
        .route(
            "/api/v1/sessions/:id/template",
            put(session::handle_set_template),
        )
        .route("/api/v1/sessions/:id/title", put(session::handle_set_title))
        // Projections
        .route("/api/v1/sessions/:id/preview", get(session::handle_preview))
        .route(
            "/api/v1/sessions/:id/preview/markdown",
            get(session::handle_preview_markdown),
        )
        .route("/api/v1/sessions/:id/payload", get(session::handle_payload))
        // Collaborators
        .route("/api/v1/sessions/:id/save", post(storage::handle_save))
        .route("/api/v1/resumes", get(storage::handle_list_resumes))
        .route(
            "/api/v1/sessions/:id/photo",
            post(uploads::handle_upload_photo)
                .delete(uploads::handle_remove_photo)
                .layer(DefaultBodyLimit::max(photo_body_limit)),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/sessions/:id/export", post(export::handle_export))
        .with_state(state)
}
