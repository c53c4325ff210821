use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow};
use crate::storage::{ResumeRecord, ResumeStore};

/// `ResumeStore` over the `resumes` table:
/// `id uuid pk, user_id uuid, title text, template_id text, payload jsonb,
/// is_published bool, created_at timestamptz, updated_at timestamptz`.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn save(&self, record: &ResumeRecord) -> Result<DateTime<Utc>, AppError> {
        let saved: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            INSERT INTO resumes (id, user_id, title, template_id, payload, is_published)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                template_id = EXCLUDED.template_id,
                payload = EXCLUDED.payload,
                is_published = EXCLUDED.is_published,
                updated_at = NOW()
            WHERE resumes.user_id = EXCLUDED.user_id
            RETURNING updated_at
            "#,
        )
        .bind(record.id)
        .bind(record.owner_id)
        .bind(&record.title)
        .bind(&record.template_id)
        .bind(Json(&record.payload))
        .bind(record.is_published)
        .fetch_optional(&self.pool)
        .await?;

        let (updated_at,) = saved
            .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", record.id)))?;
        info!("Saved resume {} for user {}", record.id, record.owner_id);
        Ok(updated_at)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummaryRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeSummaryRow>(
            r#"
            SELECT id, title, template_id, is_published, created_at, updated_at
            FROM resumes
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn load(&self, owner_id: Uuid, resume_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(resume_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
