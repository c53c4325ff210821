use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::{Content, Document, DocumentError, SectionKind};
use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::{validate_photo, UploadError};

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub photo: Option<String>,
}

/// Writes `photo` into the header through an ordinary content replacement.
fn apply_photo(document: &mut Document, photo: Option<String>) -> Result<(), AppError> {
    let header = document
        .header()
        .ok_or_else(|| anyhow::anyhow!("document has no header section"))?;
    let id = header.id.clone();
    let mut content = match header.content.clone() {
        Content::Header(content) => content,
        other => {
            return Err(DocumentError::KindMismatch {
                expected: SectionKind::Header,
                found: other.kind(),
            }
            .into())
        }
    };
    content.photo = photo;
    document.set_section_content(&id, Content::Header(content))?;
    Ok(())
}

async fn read_photo_field(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Bytes), UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;
        return Ok((content_type, data));
    }
    Err(UploadError::MissingPhoto)
}

/// POST /api/v1/sessions/:id/photo
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PhotoResponse>, AppError> {
    let owner_id = state
        .sessions
        .with_session(session_id, |s| Ok(s.owner_id))
        .await?;

    let (content_type, data) = read_photo_field(&mut multipart).await?;
    let format = validate_photo(
        content_type.as_deref(),
        data.len(),
        state.config.max_photo_bytes,
    )
    .map_err(|e| {
        warn!("Rejected photo for session {session_id}: {e}");
        e
    })?;

    let url = state.photos.put_photo(owner_id, format, data).await?;

    state
        .sessions
        .with_session(session_id, |s| apply_photo(&mut s.document, Some(url.clone())))
        .await?;
    info!("Session {session_id} photo set");
    Ok(Json(PhotoResponse { photo: Some(url) }))
}

/// DELETE /api/v1/sessions/:id/photo
pub async fn handle_remove_photo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PhotoResponse>, AppError> {
    state
        .sessions
        .with_session(session_id, |s| apply_photo(&mut s.document, None))
        .await?;
    Ok(Json(PhotoResponse { photo: None }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_of(document: &Document) -> Option<String> {
        match &document.header().unwrap().content {
            Content::Header(header) => header.photo.clone(),
            _ => None,
        }
    }

    #[test]
    fn test_apply_photo_sets_and_clears_reference() {
        let mut doc = Document::new();
        apply_photo(&mut doc, Some("http://cdn/p.png".to_string())).unwrap();
        assert_eq!(photo_of(&doc).as_deref(), Some("http://cdn/p.png"));
        apply_photo(&mut doc, None).unwrap();
        assert_eq!(photo_of(&doc), None);
    }

    #[test]
    fn test_apply_photo_keeps_other_header_fields() {
        let mut doc = Document::new();
        let header = doc.header().unwrap().id.clone();
        doc.set_section_content(
            &header,
            Content::Header(crate::document::HeaderContent {
                name: "Ada".to_string(),
                ..Default::default()
            }),
        )
        .unwrap();
        apply_photo(&mut doc, Some("http://cdn/p.png".to_string())).unwrap();
        let Content::Header(content) = &doc.header().unwrap().content else {
            panic!("expected header");
        };
        assert_eq!(content.name, "Ada");
    }
}
