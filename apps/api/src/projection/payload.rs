//! Persistence payload: the record handed to the résumé store.
//!
//! The first section of each legacy kind fills the distinguished top-level
//! fields (`personal_info`, `summary`, `experience`, `education`, `skills`,
//! `projects`). Every other section is kept in `additional_sections`, and
//! `layout` records id, kind, title and visibility of all sections in order,
//! so nothing is lost between save and load. Records written before `layout`
//! existed still load as the default skeleton.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::document::content::{
    EducationEntry, ExperienceEntry, Item, ItemList, ProjectEntry, SkillGroup,
};
use crate::document::model::DEFAULT_SKELETON;
use crate::document::registry::default_content;
use crate::document::{
    Content, Document, DocumentError, HeaderContent, IdGenerator, Section, SectionId, SectionKind,
    TextContent,
};
use crate::projection::template::TemplateDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumePayload {
    pub template_id: String,
    pub personal_info: HeaderContent,
    pub summary: String,
    pub experience: Vec<Item<ExperienceEntry>>,
    pub education: Vec<Item<EducationEntry>>,
    pub skills: Vec<Item<SkillGroup>>,
    pub projects: Vec<Item<ProjectEntry>>,
    pub additional_sections: Vec<StoredSection>,
    pub layout: Vec<SectionLayout>,
}

/// A section whose content has no distinguished top-level field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSection {
    pub id: SectionId,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: SectionId,
    pub kind: SectionKind,
    pub title: String,
    pub visible: bool,
}

/// Flattens `document` into its storage record. The template contributes
/// only its id.
pub fn to_persistence_payload(document: &Document, template: &TemplateDescriptor) -> ResumePayload {
    let mut payload = ResumePayload {
        template_id: template.id.clone(),
        ..Default::default()
    };
    let mut filled: HashSet<SectionKind> = HashSet::new();

    for section in document.sections() {
        payload.layout.push(SectionLayout {
            id: section.id.clone(),
            kind: section.kind,
            title: section.title.clone(),
            visible: section.visible,
        });

        let primary = filled.insert(section.kind) && fill_primary(&mut payload, &section.content);
        if !primary {
            payload.additional_sections.push(StoredSection {
                id: section.id.clone(),
                content: section.content.clone(),
            });
        }
    }
    payload
}

/// Copies `content` into its distinguished field. Returns false for kinds that
/// have none.
fn fill_primary(payload: &mut ResumePayload, content: &Content) -> bool {
    match content {
        Content::Header(header) => payload.personal_info = header.clone(),
        Content::Summary(body) => payload.summary = body.text.clone(),
        Content::Experience(list) => payload.experience = list.items.clone(),
        Content::Education(list) => payload.education = list.items.clone(),
        Content::Skills(list) => payload.skills = list.items.clone(),
        Content::Projects(list) => payload.projects = list.items.clone(),
        _ => return false,
    }
    true
}

/// Distinguished fields not yet claimed by a section during a load.
struct Primaries {
    header: Option<HeaderContent>,
    summary: Option<String>,
    experience: Option<Vec<Item<ExperienceEntry>>>,
    education: Option<Vec<Item<EducationEntry>>>,
    skills: Option<Vec<Item<SkillGroup>>>,
    projects: Option<Vec<Item<ProjectEntry>>>,
}

impl Primaries {
    fn take(&mut self, kind: SectionKind) -> Option<Content> {
        match kind {
            SectionKind::Header => self.header.take().map(Content::Header),
            SectionKind::Summary => self
                .summary
                .take()
                .map(|text| Content::Summary(TextContent { text })),
            SectionKind::Experience => self
                .experience
                .take()
                .map(|items| Content::Experience(ItemList::new(items))),
            SectionKind::Education => self
                .education
                .take()
                .map(|items| Content::Education(ItemList::new(items))),
            SectionKind::Skills => self
                .skills
                .take()
                .map(|items| Content::Skills(ItemList::new(items))),
            SectionKind::Projects => self
                .projects
                .take()
                .map(|items| Content::Projects(ItemList::new(items))),
            _ => None,
        }
    }
}

fn legacy_layout(additional: &[StoredSection]) -> Vec<SectionLayout> {
    let skeleton = DEFAULT_SKELETON.iter().map(|kind| SectionLayout {
        id: SectionId::from(kind.as_str()),
        kind: *kind,
        title: kind.default_title().to_string(),
        visible: true,
    });
    let extra = additional.iter().map(|stored| SectionLayout {
        id: stored.id.clone(),
        kind: stored.content.kind(),
        title: stored.content.kind().default_title().to_string(),
        visible: true,
    });
    skeleton.chain(extra).collect()
}

impl Document {
    /// Rebuilds a document from a stored payload.
    ///
    /// Repeated section ids and extra pinned sections are dropped; a missing
    /// header or summary is restored. Content whose kind disagrees with its
    /// layout entry, or whose item ids repeat, is rejected.
    pub fn from_payload(payload: ResumePayload) -> Result<Self, DocumentError> {
        let ResumePayload {
            personal_info,
            summary,
            experience,
            education,
            skills,
            projects,
            additional_sections,
            layout,
            ..
        } = payload;

        let layout = if layout.is_empty() {
            legacy_layout(&additional_sections)
        } else {
            layout
        };
        let mut primaries = Primaries {
            header: Some(personal_info),
            summary: Some(summary),
            experience: Some(experience),
            education: Some(education),
            skills: Some(skills),
            projects: Some(projects),
        };
        let mut stored: HashMap<SectionId, Content> = additional_sections
            .into_iter()
            .map(|s| (s.id, s.content))
            .collect();

        let mut seen = HashSet::new();
        let mut sections: Vec<Section> = Vec::with_capacity(layout.len());
        for entry in layout {
            if !seen.insert(entry.id.clone()) {
                continue;
            }
            if entry.kind.is_pinned() && sections.iter().any(|s| s.kind == entry.kind) {
                continue;
            }
            let content = match stored.remove(&entry.id) {
                Some(content) => content,
                None => primaries
                    .take(entry.kind)
                    .unwrap_or_else(|| default_content(entry.kind)),
            };
            if content.kind() != entry.kind {
                return Err(DocumentError::KindMismatch {
                    expected: entry.kind,
                    found: content.kind(),
                });
            }
            content.check_unique_item_ids()?;
            IdGenerator::admit(entry.id.as_str())?;
            if let Some(items) = content.items() {
                for item_id in items.item_ids() {
                    IdGenerator::admit(item_id.as_str())?;
                }
            }
            sections.push(Section {
                id: entry.id,
                kind: entry.kind,
                title: entry.title,
                content,
                visible: entry.visible,
                order: 0,
            });
        }

        let mut document = Document::from_sections(sections);
        for (position, kind) in [(0, SectionKind::Header), (1, SectionKind::Summary)] {
            if document.first_of_kind(kind).is_some() {
                continue;
            }
            let content = primaries
                .take(kind)
                .unwrap_or_else(|| default_content(kind));
            document.push_section(kind, kind.default_title().to_string(), content);
            let sections = document.sections_mut();
            let at = position.min(sections.len() - 1);
            sections[at..].rotate_right(1);
            document.renumber();
        }
        Ok(document)
    }
}
