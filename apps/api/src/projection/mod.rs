// Projection engine: pure, deterministic views over a Document.
// Each function borrows the document and the active template read-only.

pub mod markdown;
pub mod payload;
pub mod render;
pub mod template;

pub use markdown::render_markdown;
pub use payload::{to_persistence_payload, ResumePayload};
pub use render::{to_render_tree, RenderTree};
pub use template::{TemplateCatalog, TemplateDescriptor};
