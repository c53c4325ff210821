use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentError, SectionKind};

/// Largest numeric id suffix accepted from outside the generator.
///
/// Matches the largest integer a JavaScript client can hold exactly, which
/// covers millisecond timestamps and leaves the counter headroom to grow.
pub const MAX_FOREIGN_ID_SUFFIX: u64 = (1 << 53) - 1;

/// Stable identifier of a section within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

/// Stable identifier of an item within a collection section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl SectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        SectionId(s.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// Monotonic id source scoped to one document.
///
/// Ids look like `<kind>-<n>` for sections and `item-<n>` for items, sharing one
/// counter. Ids that enter the document from outside (content replacement,
/// loaded snapshots) are passed through [`IdGenerator::observe`] so the counter
/// always stays ahead of every numeric suffix in use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section_id(&mut self, kind: SectionKind) -> SectionId {
        SectionId(format!("{}-{}", kind, self.bump()))
    }

    pub fn item_id(&mut self) -> ItemId {
        ItemId(format!("item-{}", self.bump()))
    }

    /// Rejects an incoming id whose numeric suffix is above [`MAX_FOREIGN_ID_SUFFIX`].
    pub fn admit(id: &str) -> Result<(), DocumentError> {
        match numeric_suffix(id) {
            Some(n) if n > MAX_FOREIGN_ID_SUFFIX => Err(DocumentError::InvalidFieldValue {
                field: "id".to_string(),
                reason: format!("'{id}' has a numeric suffix above {MAX_FOREIGN_ID_SUFFIX}"),
            }),
            _ => Ok(()),
        }
    }

    /// Advances the counter past the numeric suffix of `id`, if it has one.
    /// Suffixes that [`IdGenerator::admit`] would reject are ignored.
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = numeric_suffix(id).filter(|n| *n <= MAX_FOREIGN_ID_SUFFIX) {
            self.last = self.last.max(n);
        }
    }

    fn bump(&mut self) -> u64 {
        // `last` starts at most at MAX_FOREIGN_ID_SUFFIX, so 2^63 ids remain.
        self.last = self.last.saturating_add(1);
        self.last
    }
}

fn numeric_suffix(id: &str) -> Option<u64> {
    let suffix = id.rsplit_once('-').map(|(_, n)| n).unwrap_or(id);
    suffix.parse::<u64>().ok()
}
