// Résumé document core: section/item model, type registry and the mutation API.
// Pure and synchronous: no I/O, logging or async. The session layer owns
// one Document per editing session and is its only caller.

pub mod content;
pub mod ids;
pub mod kind;
pub mod model;
pub mod mutations;
pub mod registry;

pub use content::{Content, FieldValue, HeaderContent, TextContent};
pub use ids::{IdGenerator, ItemId, SectionId};
pub use kind::SectionKind;
pub use model::{Document, Section};
pub use mutations::{Mutation, MutationOutcome};

use thiserror::Error;

/// Every way a document operation can be rejected.
///
/// A rejected operation leaves the document exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Unrecognized section kind '{0}'")]
    InvalidKind(String),

    #[error("Sections of kind '{0}' do not hold items")]
    NotACollection(SectionKind),

    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    #[error("Section {0} not found")]
    SectionNotFound(SectionId),

    #[error("Ids must list every current entry exactly once")]
    InvalidPermutation,

    #[error("Section {0} is pinned and cannot be removed")]
    PinnedSectionRemoval(SectionId),

    #[error("A '{0}' section already exists")]
    PinnedSectionExists(SectionKind),

    #[error("Expected '{expected}' content, got '{found}'")]
    KindMismatch {
        expected: SectionKind,
        found: SectionKind,
    },

    #[error("'{kind}' items have no field '{field}'")]
    UnknownField { kind: SectionKind, field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("Item id {0} appears more than once")]
    DuplicateItemId(ItemId),
}

impl DocumentError {
    /// Stable machine-readable code surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::InvalidKind(_) => "INVALID_KIND",
            DocumentError::NotACollection(_) => "NOT_A_COLLECTION",
            DocumentError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            DocumentError::SectionNotFound(_) => "SECTION_NOT_FOUND",
            DocumentError::InvalidPermutation => "INVALID_PERMUTATION",
            DocumentError::PinnedSectionRemoval(_) => "PINNED_SECTION_REMOVAL",
            DocumentError::PinnedSectionExists(_) => "PINNED_SECTION_EXISTS",
            DocumentError::KindMismatch { .. } => "KIND_MISMATCH",
            DocumentError::UnknownField { .. } => "UNKNOWN_FIELD",
            DocumentError::InvalidFieldValue { .. } => "INVALID_FIELD_VALUE",
            DocumentError::DuplicateItemId(_) => "DUPLICATE_ITEM_ID",
        }
    }
}
