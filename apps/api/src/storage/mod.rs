pub mod handlers;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow};
use crate::projection::ResumePayload;

pub use postgres::PgResumeStore;

/// A résumé as handed to the store by a save.
#[derive(Debug, Clone)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub payload: ResumePayload,
    pub is_published: bool,
}

/// Durable résumé storage, keyed by résumé id and scoped to an owner.
///
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts or replaces the record and returns its modification time.
    /// Fails with `NotFound` when the id belongs to another owner.
    async fn save(&self, record: &ResumeRecord) -> Result<DateTime<Utc>, AppError>;

    /// Stored résumés of one owner, most recently modified first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummaryRow>, AppError>;

    async fn load(&self, owner_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError>;
}
