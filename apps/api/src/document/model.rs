use serde::{Deserialize, Serialize};

use crate::document::registry::default_content;
use crate::document::{Content, IdGenerator, SectionId, SectionKind};

/// Kinds every new document starts with, in display order.
pub const DEFAULT_SKELETON: [SectionKind; 6] = [
    SectionKind::Header,
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Projects,
];

/// A top-level block of a résumé.
///
/// `kind` always equals `content.kind()`; only the mutation API writes sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub kind: SectionKind,
    pub title: String,
    pub content: Content,
    pub visible: bool,
    pub order: u32,
}

/// An ordered set of sections owned by one editing session.
///
/// Sections are stored in `order` sequence and `order` always equals the
/// section's index, so iteration order and ranking never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
    #[serde(skip)]
    pub(crate) ids: IdGenerator,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates the default skeleton: header, summary, experience, education,
    /// skills and projects, all empty and visible.
    pub fn new() -> Self {
        let mut document = Self {
            sections: Vec::with_capacity(DEFAULT_SKELETON.len()),
            ids: IdGenerator::new(),
        };
        for kind in DEFAULT_SKELETON {
            document.push_section(kind, kind.default_title().to_string(), default_content(kind));
        }
        document
    }

    /// Assembles a document from sections restored elsewhere (e.g. a stored
    /// payload). Orders are renumbered and every id is observed so newly
    /// generated ids cannot collide with restored ones.
    pub(crate) fn from_sections(sections: Vec<Section>) -> Self {
        let mut ids = IdGenerator::new();
        for section in &sections {
            ids.observe(section.id.as_str());
            if let Some(items) = section.content.items() {
                for id in items.item_ids() {
                    ids.observe(id.as_str());
                }
            }
        }
        let mut document = Self { sections, ids };
        document.renumber();
        document
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// First section of `kind` in document order.
    pub fn first_of_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn header(&self) -> Option<&Section> {
        self.first_of_kind(SectionKind::Header)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    pub(crate) fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }

    pub(crate) fn push_section(
        &mut self,
        kind: SectionKind,
        title: String,
        content: Content,
    ) -> &Section {
        let id = self.ids.section_id(kind);
        let order = self.sections.len() as u32;
        self.sections.push(Section {
            id,
            kind,
            title,
            content,
            visible: true,
            order,
        });
        &self.sections[self.sections.len() - 1]
    }

    /// Reassigns `order` to match storage position: contiguous from zero.
    pub(crate) fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as u32;
        }
    }

    /// Structural invariants that must hold after every mutation.
    pub fn invariants_hold(&self) -> bool {
        let ordered = self
            .sections
            .iter()
            .enumerate()
            .all(|(index, s)| s.order == index as u32);
        let kinds_agree = self.sections.iter().all(|s| s.kind == s.content.kind());
        let count = |kind| self.sections.iter().filter(|s| s.kind == kind).count();
        let unique_items = self
            .sections
            .iter()
            .all(|s| s.content.check_unique_item_ids().is_ok());
        ordered
            && kinds_agree
            && count(SectionKind::Header) == 1
            && count(SectionKind::Summary) <= 1
            && unique_items
    }
}
