use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportQueue;
use crate::generation::ContentGenerator;
use crate::projection::TemplateCatalog;
use crate::session::SessionStore;
use crate::storage::ResumeStore;
use crate::uploads::PhotoStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every collaborator sits behind a trait object so the router can be driven
/// in tests with in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub templates: Arc<TemplateCatalog>,
    pub resumes: Arc<dyn ResumeStore>,
    pub photos: Arc<dyn PhotoStore>,
    pub generator: Arc<dyn ContentGenerator>,
    pub exports: Arc<dyn ExportQueue>,
}
