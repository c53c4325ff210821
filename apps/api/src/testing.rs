// In-memory collaborators for router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::config::Config;
use crate::document::SectionKind;
use crate::errors::AppError;
use crate::export::{ExportJob, ExportQueue};
use crate::generation::ContentGenerator;
use crate::llm_client::LlmError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow};
use crate::projection::TemplateCatalog;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::storage::{ResumeRecord, ResumeStore};
use crate::uploads::{PhotoFormat, PhotoStore};

#[derive(Default)]
pub struct InMemoryResumeStore {
    rows: Mutex<HashMap<Uuid, ResumeRow>>,
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn save(&self, record: &ResumeRecord) -> Result<DateTime<Utc>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let created_at = match rows.get(&record.id) {
            Some(existing) if existing.user_id != record.owner_id => {
                return Err(AppError::NotFound(format!("Resume {} not found", record.id)))
            }
            Some(existing) => existing.created_at,
            None => now,
        };
        rows.insert(
            record.id,
            ResumeRow {
                id: record.id,
                user_id: record.owner_id,
                title: record.title.clone(),
                template_id: record.template_id.clone(),
                payload: Json(record.payload.clone()),
                is_published: record.is_published,
                created_at,
                updated_at: now,
            },
        );
        Ok(now)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummaryRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut listed: Vec<ResumeSummaryRow> = rows
            .values()
            .filter(|row| row.user_id == owner_id)
            .map(|row| ResumeSummaryRow {
                id: row.id,
                title: row.title.clone(),
                template_id: row.template_id.clone(),
                is_published: row.is_published,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listed)
    }

    async fn load(&self, owner_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&resume_id)
            .filter(|row| row.user_id == owner_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakePhotoStore {
    pub fail: bool,
    pub uploads: AtomicUsize,
}

#[async_trait]
impl PhotoStore for FakePhotoStore {
    async fn put_photo(
        &self,
        owner_id: Uuid,
        format: PhotoFormat,
        _bytes: Bytes,
    ) -> Result<String, AppError> {
        if self.fail {
            return Err(AppError::S3("bucket unavailable".to_string()));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!(
            "https://cdn.test/photos/{owner_id}/{n}.{}",
            format.extension()
        ))
    }
}

#[derive(Default)]
pub struct FakeGenerator {
    pub fail: bool,
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(&self, kind: SectionKind, context_hint: &str) -> Result<String, AppError> {
        if self.fail {
            return Err(LlmError::EmptyContent.into());
        }
        Ok(format!("Generated {kind} about {context_hint}"))
    }
}

#[derive(Default)]
pub struct RecordingExportQueue {
    pub jobs: Mutex<Vec<ExportJob>>,
}

#[async_trait]
impl ExportQueue for RecordingExportQueue {
    async fn enqueue(&self, job: &ExportJob) -> Result<(), AppError> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub resumes: Arc<InMemoryResumeStore>,
    pub photos: Arc<FakePhotoStore>,
    pub exports: Arc<RecordingExportQueue>,
}

pub fn harness() -> Harness {
    harness_with(FakePhotoStore::default(), FakeGenerator::default())
}

pub fn harness_with(photos: FakePhotoStore, generator: FakeGenerator) -> Harness {
    let resumes = Arc::new(InMemoryResumeStore::default());
    let photos = Arc::new(photos);
    let exports = Arc::new(RecordingExportQueue::default());
    let state = AppState {
        config: Config::for_tests(),
        sessions: SessionStore::new(),
        templates: Arc::new(TemplateCatalog::builtin()),
        resumes: resumes.clone(),
        photos: photos.clone(),
        generator: Arc::new(generator),
        exports: exports.clone(),
    };
    Harness {
        state,
        resumes,
        photos,
        exports,
    }
}
