// Editing sessions: each one exclusively owns a Document for its lifetime.
//
// The store hands out short synchronous critical sections through
// `with_session`. Collaborator calls (storage, S3, LLM, Redis) must run
// between two such sections, never inside one.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::document::Document;
use crate::errors::AppError;
use crate::projection::{
    to_persistence_payload, to_render_tree, RenderTree, ResumePayload, TemplateDescriptor,
};

pub const DEFAULT_RESUME_TITLE: &str = "My Resume";

#[derive(Debug, Clone)]
pub struct EditingSession {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Key of the stored résumé this session saves to.
    pub resume_id: Uuid,
    pub title: String,
    pub template: TemplateDescriptor,
    pub document: Document,
    pub opened_at: DateTime<Utc>,
    /// Refreshed on every access; idle sessions are evicted by [`SessionStore::evict_idle`].
    pub last_touched: Instant,
}

/// Read-only view of a session returned by the API.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub owner_id: Uuid,
    pub resume_id: Uuid,
    pub title: String,
    pub template: TemplateDescriptor,
    pub document: Document,
    pub opened_at: DateTime<Utc>,
}

impl EditingSession {
    pub fn new(
        owner_id: Uuid,
        resume_id: Uuid,
        title: String,
        template: TemplateDescriptor,
        document: Document,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            resume_id,
            title,
            template,
            document,
            opened_at: Utc::now(),
            last_touched: Instant::now(),
        }
    }

    pub fn render_tree(&self) -> RenderTree {
        to_render_tree(&self.document, &self.template)
    }

    pub fn payload(&self) -> ResumePayload {
        to_persistence_payload(&self.document, &self.template)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            owner_id: self.owner_id,
            resume_id: self.resume_id,
            title: self.title.clone(),
            template: self.template.clone(),
            document: self.document.clone(),
            opened_at: self.opened_at,
        }
    }
}

/// In-memory registry of open editing sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, EditingSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `session` and returns its view.
    pub async fn open(&self, session: EditingSession) -> SessionView {
        let view = session.view();
        self.sessions.lock().await.insert(session.id, session);
        view
    }

    /// Runs `f` against one session under the store lock.
    ///
    /// `f` is synchronous, so the lock is never held across an await point.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut EditingSession) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        session.last_touched = Instant::now();
        f(session)
    }

    /// Ends a session, discarding its document.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Ends every session untouched for longer than `ttl`. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_touched) <= ttl);
        before - sessions.len()
    }

    /// Spawns a background task that runs [`SessionStore::evict_idle`] every `every`.
    pub fn spawn_idle_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticks = interval(every);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!(evicted, "Evicted idle editing sessions");
                }
            }
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
