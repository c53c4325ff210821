//! Render tree projection, the structure behind the live preview.
//!
//! Block order: header first, then every visible, non-empty section in
//! `order` sequence. The template only decides presentation (display style,
//! photo gating); it is borrowed read-only and never reaches the document.

use serde::Serialize;

use crate::document::content::{
    CertificationEntry, EducationEntry, ExperienceEntry, HeaderContent, Item, ProjectEntry,
    Proficiency, SkillGroup,
};
use crate::document::{Content, Document, ItemId, Section, SectionId, SectionKind};
use crate::projection::template::{DisplayStyle, TemplateDescriptor};

const NAME_PLACEHOLDER: &str = "Your Name";
const TITLE_PLACEHOLDER: &str = "Professional Title";

// ────────────────────────────────────────────────────────────────────────────
// Tree types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub template_id: String,
    pub style: DisplayStyle,
    pub blocks: Vec<RenderBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBlock {
    pub section_id: SectionId,
    pub kind: SectionKind,
    pub title: String,
    #[serde(flatten)]
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum BlockBody {
    Header(HeaderBlock),
    Paragraph { text: String },
    Entries { entries: Vec<EntryBlock> },
    SkillGroups { groups: Vec<SkillGroupBlock> },
    Languages { languages: Vec<LanguageLine> },
    Tags { tags: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub title: String,
    pub contacts: Vec<Contact>,
    /// Present only when the template supports photos and one is stored.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Email,
    Phone,
    Location,
    Linkedin,
    Website,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub channel: ContactChannel,
    pub value: String,
    /// Display text; links show a fixed label instead of the raw URL.
    pub label: String,
}

/// One dated entry: heading and subheading on the left, `aside` lines right-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryBlock {
    pub item_id: ItemId,
    pub heading: String,
    pub subheading: Option<String>,
    pub aside: Vec<String>,
    pub detail: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroupBlock {
    pub category: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageLine {
    pub item_id: ItemId,
    pub language: String,
    pub proficiency: Proficiency,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// Projects `document` into display blocks under `template`.
pub fn to_render_tree(document: &Document, template: &TemplateDescriptor) -> RenderTree {
    let mut blocks = Vec::with_capacity(document.len());

    if let Some(header) = document.header() {
        if let Content::Header(content) = &header.content {
            blocks.push(block(header, BlockBody::Header(header_block(content, template))));
        }
    }

    for section in document.sections() {
        if section.kind == SectionKind::Header || !section.visible || section.content.is_empty() {
            continue;
        }
        if let Some(body) = section_body(&section.content) {
            blocks.push(block(section, body));
        }
    }

    RenderTree {
        template_id: template.id.clone(),
        style: template.display_style,
        blocks,
    }
}

fn block(section: &Section, body: BlockBody) -> RenderBlock {
    RenderBlock {
        section_id: section.id.clone(),
        kind: section.kind,
        title: section.title.clone(),
        body,
    }
}

fn section_body(content: &Content) -> Option<BlockBody> {
    let body = match content {
        Content::Header(_) => return None,
        Content::Summary(body) | Content::Custom(body) => BlockBody::Paragraph {
            text: body.text.trim().to_string(),
        },
        Content::Experience(list) => entries(&list.items, experience_entry),
        Content::Education(list) => entries(&list.items, education_entry),
        Content::Projects(list) => entries(&list.items, project_entry),
        Content::Certifications(list) => entries(&list.items, certification_entry),
        Content::Skills(list) => BlockBody::SkillGroups {
            groups: group_skills(&list.items),
        },
        Content::Languages(list) => BlockBody::Languages {
            languages: list
                .items
                .iter()
                .map(|item| LanguageLine {
                    item_id: item.id.clone(),
                    language: item.fields.language.clone(),
                    proficiency: item.fields.proficiency,
                })
                .collect(),
        },
        Content::Interests(list) => BlockBody::Tags {
            tags: list
                .items
                .iter()
                .filter_map(|item| non_blank(&item.fields.interest))
                .collect(),
        },
    };
    Some(body)
}

fn header_block(content: &HeaderContent, template: &TemplateDescriptor) -> HeaderBlock {
    let channels = [
        (ContactChannel::Email, &content.email, None),
        (ContactChannel::Phone, &content.phone, None),
        (ContactChannel::Location, &content.location, None),
        (ContactChannel::Linkedin, &content.linkedin, Some("LinkedIn")),
        (ContactChannel::Website, &content.website, Some("Website")),
    ];
    let contacts = channels
        .into_iter()
        .filter_map(|(channel, value, label)| {
            let value = non_blank(value)?;
            Some(Contact {
                channel,
                label: label.map(String::from).unwrap_or_else(|| value.clone()),
                value,
            })
        })
        .collect();

    HeaderBlock {
        name: non_blank(&content.name).unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
        title: non_blank(&content.title).unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        contacts,
        photo: if template.supports_photo {
            content.photo.as_deref().and_then(non_blank)
        } else {
            None
        },
    }
}

fn entries<T>(items: &[Item<T>], to_entry: fn(&ItemId, &T) -> EntryBlock) -> BlockBody {
    BlockBody::Entries {
        entries: items
            .iter()
            .map(|item| to_entry(&item.id, &item.fields))
            .collect(),
    }
}

fn experience_entry(id: &ItemId, e: &ExperienceEntry) -> EntryBlock {
    EntryBlock {
        item_id: id.clone(),
        heading: e.position.trim().to_string(),
        subheading: non_blank(&e.company),
        aside: aside(&[&e.duration, &e.location]),
        detail: non_blank(&e.description),
        link: None,
    }
}

fn education_entry(id: &ItemId, e: &EducationEntry) -> EntryBlock {
    EntryBlock {
        item_id: id.clone(),
        heading: e.degree.trim().to_string(),
        subheading: non_blank(&e.institution),
        aside: aside(&[&e.year, &e.location]),
        detail: non_blank(&e.gpa).map(|gpa| format!("GPA: {gpa}")),
        link: None,
    }
}

fn project_entry(id: &ItemId, e: &ProjectEntry) -> EntryBlock {
    EntryBlock {
        item_id: id.clone(),
        heading: e.name.trim().to_string(),
        subheading: non_blank(&e.technologies),
        aside: aside(&[&e.duration]),
        detail: non_blank(&e.description),
        link: non_blank(&e.link),
    }
}

fn certification_entry(id: &ItemId, e: &CertificationEntry) -> EntryBlock {
    EntryBlock {
        item_id: id.clone(),
        heading: e.name.trim().to_string(),
        subheading: non_blank(&e.issuer),
        aside: aside(&[&e.date]),
        detail: None,
        link: non_blank(&e.link),
    }
}

/// Merges skill items sharing a category, in first-appearance order, dropping
/// blank and repeated skills.
fn group_skills(items: &[Item<SkillGroup>]) -> Vec<SkillGroupBlock> {
    let mut groups: Vec<SkillGroupBlock> = Vec::new();
    for item in items {
        let category = item.fields.category.trim();
        let index = match groups.iter().position(|g| g.category == category) {
            Some(index) => index,
            None => {
                groups.push(SkillGroupBlock {
                    category: category.to_string(),
                    skills: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        for skill in item.fields.items.iter().filter_map(|s| non_blank(s)) {
            if !group.skills.contains(&skill) {
                group.skills.push(skill);
            }
        }
    }
    groups
}

fn aside(values: &[&String]) -> Vec<String> {
    values.iter().filter_map(|v| non_blank(v)).collect()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FieldValue, Mutation};

    fn first_id(doc: &Document, kind: SectionKind) -> SectionId {
        doc.first_of_kind(kind).unwrap().id.clone()
    }

    fn with_photo(doc: &mut Document) {
        let header = first_id(doc, SectionKind::Header);
        doc.set_section_content(
            &header,
            Content::Header(HeaderContent {
                name: "Ada Lovelace".to_string(),
                photo: Some("https://cdn.example.com/ada.png".to_string()),
                ..Default::default()
            }),
        )
        .unwrap();
    }

    fn header_of(tree: &RenderTree) -> &HeaderBlock {
        match &tree.blocks[0].body {
            BlockBody::Header(header) => header,
            other => panic!("expected header block first, got {other:?}"),
        }
    }

    #[test]
    fn test_default_document_renders_only_header_with_placeholders() {
        let tree = to_render_tree(&Document::new(), &TemplateDescriptor::default());
        assert_eq!(tree.blocks.len(), 1);
        let header = header_of(&tree);
        assert_eq!(header.name, "Your Name");
        assert_eq!(header.title, "Professional Title");
        assert!(header.contacts.is_empty());
    }

    #[test]
    fn test_experience_scenario_single_block_with_company() {
        let mut doc = Document::new();
        let experience = first_id(&doc, SectionKind::Experience);
        let item = doc.add_item(&experience, SectionKind::Experience).unwrap();
        doc.update_item_field(&experience, &item, "company", FieldValue::from("Acme"))
            .unwrap();

        let tree = to_render_tree(&doc, &TemplateDescriptor::default());
        let experience_blocks: Vec<_> = tree
            .blocks
            .iter()
            .filter(|b| b.kind == SectionKind::Experience)
            .collect();
        assert_eq!(experience_blocks.len(), 1);
        let BlockBody::Entries { entries } = &experience_blocks[0].body else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subheading.as_deref(), Some("Acme"));
        assert_eq!(entries[0].item_id, item);
    }

    #[test]
    fn test_header_first_even_when_reordered_last() {
        let mut doc = Document::new();
        let summary = first_id(&doc, SectionKind::Summary);
        doc.set_section_content(
            &summary,
            Content::Summary(crate::document::TextContent {
                text: "Engineer".to_string(),
            }),
        )
        .unwrap();
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        ids.rotate_left(1);
        doc.reorder_sections(&ids).unwrap();
        assert_eq!(doc.sections().last().unwrap().kind, SectionKind::Header);

        let tree = to_render_tree(&doc, &TemplateDescriptor::default());
        assert_eq!(tree.blocks[0].kind, SectionKind::Header);
        assert_eq!(tree.blocks[1].kind, SectionKind::Summary);
    }

    #[test]
    fn test_hidden_and_blank_sections_are_suppressed() {
        let mut doc = Document::new();
        let summary = first_id(&doc, SectionKind::Summary);
        doc.apply(Mutation::SetSectionContent {
            section_id: summary.clone(),
            content: Content::Summary(crate::document::TextContent {
                text: "   ".to_string(),
            }),
        })
        .unwrap();
        let skills = first_id(&doc, SectionKind::Skills);
        doc.add_item(&skills, SectionKind::Skills).unwrap();
        doc.set_section_visibility(&skills, false).unwrap();

        let tree = to_render_tree(&doc, &TemplateDescriptor::default());
        assert_eq!(tree.blocks.len(), 1);
    }

    #[test]
    fn test_photo_gated_by_template() {
        let mut doc = Document::new();
        with_photo(&mut doc);
        let with = to_render_tree(&doc, &TemplateDescriptor::default());
        assert_eq!(
            header_of(&with).photo.as_deref(),
            Some("https://cdn.example.com/ada.png")
        );

        let mut text_only = TemplateDescriptor::default();
        text_only.supports_photo = false;
        let before = doc.clone();
        let without = to_render_tree(&doc, &text_only);
        assert_eq!(header_of(&without).photo, None);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut doc = Document::new();
        with_photo(&mut doc);
        let template = TemplateDescriptor::default();
        let a = serde_json::to_string(&to_render_tree(&doc, &template)).unwrap();
        let b = serde_json::to_string(&to_render_tree(&doc, &template)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_skills_grouped_by_category() {
        let mut doc = Document::new();
        let skills = first_id(&doc, SectionKind::Skills);
        for (category, items) in [
            ("Languages", "Rust, Go"),
            ("Cloud", "AWS"),
            ("Languages", "Go, SQL"),
        ] {
            let item = doc.add_item(&skills, SectionKind::Skills).unwrap();
            doc.update_item_field(&skills, &item, "category", category.into())
                .unwrap();
            doc.update_item_field(&skills, &item, "items", items.into())
                .unwrap();
        }

        let tree = to_render_tree(&doc, &TemplateDescriptor::default());
        let BlockBody::SkillGroups { groups } = &tree.blocks[1].body else {
            panic!("expected skill groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Languages");
        assert_eq!(groups[0].skills, vec!["Rust", "Go", "SQL"]);
        assert_eq!(groups[1].skills, vec!["AWS"]);
    }

    #[test]
    fn test_experience_aside_holds_duration_and_location() {
        let entry = experience_entry(
            &ItemId::from("item-1"),
            &ExperienceEntry {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                duration: "2020 - 2023".to_string(),
                location: String::new(),
                description: "Built things".to_string(),
            },
        );
        assert_eq!(entry.heading, "Engineer");
        assert_eq!(entry.aside, vec!["2020 - 2023"]);
        assert_eq!(entry.detail.as_deref(), Some("Built things"));
    }

    #[test]
    fn test_contacts_use_labels_for_links() {
        let header = header_block(
            &HeaderContent {
                email: "ada@example.com".to_string(),
                linkedin: "https://linkedin.com/in/ada".to_string(),
                ..Default::default()
            },
            &TemplateDescriptor::default(),
        );
        assert_eq!(header.contacts.len(), 2);
        assert_eq!(header.contacts[0].label, "ada@example.com");
        assert_eq!(header.contacts[1].label, "LinkedIn");
        assert_eq!(header.contacts[1].value, "https://linkedin.com/in/ada");
    }

    #[test]
    fn test_render_block_serializes_flat_with_layout_tag() {
        let tree = to_render_tree(&Document::new(), &TemplateDescriptor::default());
        let json = serde_json::to_value(&tree.blocks[0]).unwrap();
        assert_eq!(json["layout"], "header");
        assert_eq!(json["kind"], "header");
        assert_eq!(json["name"], "Your Name");
    }
}
