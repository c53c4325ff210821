// Render-to-file export: the service only queues the render tree; an
// external rasteriser consumes the Redis list and produces the file.

pub mod handlers;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::projection::RenderTree;

const FALLBACK_FILENAME: &str = "resume";

#[derive(Debug, Clone, Serialize)]
pub struct ExportJob {
    pub job_id: Uuid,
    pub filename: String,
    pub render_tree: RenderTree,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Target filename for an export: the requested name, else the résumé title,
/// with path separators replaced and a `.pdf` extension ensured.
pub fn export_filename(requested: Option<&str>, title: &str) -> String {
    let base = requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| title.trim());
    let base = if base.is_empty() {
        FALLBACK_FILENAME
    } else {
        base
    };
    let mut name = base.replace(|c: char| c == '/' || c == '\\', "-");
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

/// Destination for export jobs. Carried in `AppState` as `Arc<dyn ExportQueue>`.
#[async_trait]
pub trait ExportQueue: Send + Sync {
    async fn enqueue(&self, job: &ExportJob) -> Result<(), AppError>;
}

/// Pushes jobs as JSON onto a Redis list.
pub struct RedisExportQueue {
    client: redis::Client,
    queue: String,
}

impl RedisExportQueue {
    pub fn new(client: redis::Client, queue: String) -> Self {
        Self { client, queue }
    }
}

#[async_trait]
impl ExportQueue for RedisExportQueue {
    async fn enqueue(&self, job: &ExportJob) -> Result<(), AppError> {
        let message = serde_json::to_string(job)
            .map_err(|e| AppError::Queue(format!("Could not encode export job: {e}")))?;
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?;
        let depth: i64 = conn
            .rpush(&self.queue, message)
            .await
            .map_err(|e| AppError::Queue(e.to_string()))?;
        info!(
            "Queued export job {} ({}) on {}, depth {depth}",
            job.job_id, job.filename, self.queue
        );
        Ok(())
    }
}
