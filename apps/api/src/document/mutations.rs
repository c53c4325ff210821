//! Mutation API: the only writer of a `Document`.
//!
//! Every operation validates before it touches anything, so a rejected call
//! leaves the document unchanged. Each operation is also expressible as a
//! serialisable [`Mutation`] for callers that ship edits over the wire.

use serde::{Deserialize, Serialize};

use crate::document::content::is_permutation;
use crate::document::registry::{default_content, new_item};
use crate::document::{
    Content, Document, DocumentError, FieldValue, IdGenerator, ItemId, Section, SectionId,
    SectionKind,
};

/// One edit, as sent by a client.
///
/// Kind names travel as plain strings and are resolved when the mutation is
/// applied, so an unknown kind surfaces as `InvalidKind` rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddSection {
        kind: String,
        #[serde(default)]
        title: Option<String>,
    },
    RemoveSection {
        section_id: SectionId,
    },
    RenameSection {
        section_id: SectionId,
        title: String,
    },
    SetSectionVisibility {
        section_id: SectionId,
        visible: bool,
    },
    SetSectionContent {
        section_id: SectionId,
        content: Content,
    },
    AddItem {
        section_id: SectionId,
        kind: String,
    },
    UpdateItemField {
        section_id: SectionId,
        item_id: ItemId,
        field: String,
        value: FieldValue,
    },
    RemoveItem {
        section_id: SectionId,
        item_id: ItemId,
    },
    ReorderSections {
        section_ids: Vec<SectionId>,
    },
    ReorderItems {
        section_id: SectionId,
        item_ids: Vec<ItemId>,
    },
}

/// What an applied mutation created, if anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MutationOutcome {
    SectionAdded {
        section_id: SectionId,
    },
    ItemAdded {
        section_id: SectionId,
        item_id: ItemId,
    },
    Applied,
}

impl Document {
    /// Applies one wire-level mutation.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationOutcome, DocumentError> {
        let outcome = match mutation {
            Mutation::AddSection { kind, title } => {
                let section = self.add_section(kind.parse()?, title.as_deref())?;
                MutationOutcome::SectionAdded {
                    section_id: section.id.clone(),
                }
            }
            Mutation::RemoveSection { section_id } => {
                self.remove_section(&section_id)?;
                MutationOutcome::Applied
            }
            Mutation::RenameSection { section_id, title } => {
                self.rename_section(&section_id, title)?;
                MutationOutcome::Applied
            }
            Mutation::SetSectionVisibility {
                section_id,
                visible,
            } => {
                self.set_section_visibility(&section_id, visible)?;
                MutationOutcome::Applied
            }
            Mutation::SetSectionContent {
                section_id,
                content,
            } => {
                self.set_section_content(&section_id, content)?;
                MutationOutcome::Applied
            }
            Mutation::AddItem { section_id, kind } => {
                let item_id = self.add_item(&section_id, kind.parse()?)?;
                MutationOutcome::ItemAdded {
                    section_id,
                    item_id,
                }
            }
            Mutation::UpdateItemField {
                section_id,
                item_id,
                field,
                value,
            } => {
                self.update_item_field(&section_id, &item_id, &field, value)?;
                MutationOutcome::Applied
            }
            Mutation::RemoveItem {
                section_id,
                item_id,
            } => {
                self.remove_item(&section_id, &item_id)?;
                MutationOutcome::Applied
            }
            Mutation::ReorderSections { section_ids } => {
                self.reorder_sections(&section_ids)?;
                MutationOutcome::Applied
            }
            Mutation::ReorderItems {
                section_id,
                item_ids,
            } => {
                self.reorder_items(&section_id, &item_ids)?;
                MutationOutcome::Applied
            }
        };
        debug_assert!(self.invariants_hold());
        Ok(outcome)
    }

    /// Appends a section of `kind` with its registry default content.
    ///
    /// Pinned kinds may only be added while absent.
    pub fn add_section(
        &mut self,
        kind: SectionKind,
        title: Option<&str>,
    ) -> Result<&Section, DocumentError> {
        if kind.is_pinned() && self.first_of_kind(kind).is_some() {
            return Err(DocumentError::PinnedSectionExists(kind));
        }
        let title = title.unwrap_or(kind.default_title()).to_string();
        Ok(self.push_section(kind, title, default_content(kind)))
    }

    pub fn remove_section(&mut self, id: &SectionId) -> Result<Section, DocumentError> {
        let index = self
            .sections()
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| DocumentError::SectionNotFound(id.clone()))?;
        if self.sections()[index].kind.is_pinned() {
            return Err(DocumentError::PinnedSectionRemoval(id.clone()));
        }
        let removed = self.sections_mut().remove(index);
        self.renumber();
        Ok(removed)
    }

    pub fn rename_section(
        &mut self,
        id: &SectionId,
        title: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.require_section_mut(id)?.title = title.into();
        Ok(())
    }

    pub fn set_section_visibility(
        &mut self,
        id: &SectionId,
        visible: bool,
    ) -> Result<(), DocumentError> {
        self.require_section_mut(id)?.visible = visible;
        Ok(())
    }

    /// Replaces a section's whole content.
    ///
    /// Field values are taken as given; the content must be of the section's
    /// kind and its item ids must be unique and admitted by the id generator.
    pub fn set_section_content(
        &mut self,
        id: &SectionId,
        content: Content,
    ) -> Result<(), DocumentError> {
        let section = self
            .section(id)
            .ok_or_else(|| DocumentError::SectionNotFound(id.clone()))?;
        if content.kind() != section.kind {
            return Err(DocumentError::KindMismatch {
                expected: section.kind,
                found: content.kind(),
            });
        }
        content.check_unique_item_ids()?;

        if let Some(items) = content.items() {
            for item_id in items.item_ids() {
                IdGenerator::admit(item_id.as_str())?;
            }
            for item_id in items.item_ids() {
                self.ids.observe(item_id.as_str());
            }
        }
        self.require_section_mut(id)?.content = content;
        Ok(())
    }

    /// Appends a blank item of `kind` to a collection section and returns its id.
    pub fn add_item(
        &mut self,
        section_id: &SectionId,
        kind: SectionKind,
    ) -> Result<ItemId, DocumentError> {
        let section = self
            .section(section_id)
            .ok_or_else(|| DocumentError::SectionNotFound(section_id.clone()))?;
        if !section.kind.is_collection() {
            return Err(DocumentError::NotACollection(section.kind));
        }
        if !kind.is_collection() {
            return Err(DocumentError::NotACollection(kind));
        }
        if kind != section.kind {
            return Err(DocumentError::KindMismatch {
                expected: section.kind,
                found: kind,
            });
        }

        let item = new_item(kind, self.ids.item_id())?;
        let item_id = item.id().clone();
        self.require_section_mut(section_id)?
            .content
            .push_item(item)?;
        Ok(item_id)
    }

    pub fn update_item_field(
        &mut self,
        section_id: &SectionId,
        item_id: &ItemId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), DocumentError> {
        let section = self.require_section_mut(section_id)?;
        let kind = section.kind;
        let items = section
            .content
            .items_mut()
            .ok_or(DocumentError::NotACollection(kind))?;
        items.set_item_field(item_id, field, value)
    }

    pub fn remove_item(
        &mut self,
        section_id: &SectionId,
        item_id: &ItemId,
    ) -> Result<(), DocumentError> {
        let section = self.require_section_mut(section_id)?;
        let kind = section.kind;
        let items = section
            .content
            .items_mut()
            .ok_or(DocumentError::NotACollection(kind))?;
        items.remove_item(item_id)
    }

    /// Reorders all sections. `ids` must be a permutation of the current section ids.
    pub fn reorder_sections(&mut self, ids: &[SectionId]) -> Result<(), DocumentError> {
        let current: Vec<SectionId> = self.sections().iter().map(|s| s.id.clone()).collect();
        if !is_permutation(&current, ids) {
            return Err(DocumentError::InvalidPermutation);
        }
        let sections = self.sections_mut();
        sections.sort_by_key(|section| ids.iter().position(|id| id == &section.id));
        self.renumber();
        Ok(())
    }

    pub fn reorder_items(
        &mut self,
        section_id: &SectionId,
        ids: &[ItemId],
    ) -> Result<(), DocumentError> {
        let section = self.require_section_mut(section_id)?;
        let kind = section.kind;
        let items = section
            .content
            .items_mut()
            .ok_or(DocumentError::NotACollection(kind))?;
        items.reorder(ids)
    }

    fn require_section_mut(&mut self, id: &SectionId) -> Result<&mut Section, DocumentError> {
        self.section_mut(id)
            .ok_or_else(|| DocumentError::SectionNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::content::{ItemCollection, Proficiency};
    use crate::projection::{to_render_tree, TemplateDescriptor};

    fn section_id(doc: &Document, kind: SectionKind) -> SectionId {
        doc.first_of_kind(kind).unwrap().id.clone()
    }

    fn order_snapshot(doc: &Document) -> Vec<(SectionId, u32)> {
        doc.sections()
            .iter()
            .map(|s| (s.id.clone(), s.order))
            .collect()
    }

    #[test]
    fn test_add_section_appends_with_next_order() {
        let mut doc = Document::new();
        let section = doc.add_section(SectionKind::Languages, None).unwrap();
        assert_eq!(section.order, 6);
        assert_eq!(section.title, "Languages");
        assert!(section.id.as_str().starts_with("languages-"));
        assert!(doc.invariants_hold());
    }

    #[test]
    fn test_add_section_with_custom_title() {
        let mut doc = Document::new();
        let section = doc
            .add_section(SectionKind::Custom, Some("Volunteering"))
            .unwrap();
        assert_eq!(section.title, "Volunteering");
        assert_eq!(section.content, Content::Custom(Default::default()));
    }

    #[test]
    fn test_add_section_with_unknown_kind_via_mutation() {
        let mut doc = Document::new();
        let before = doc.clone();
        let err = doc
            .apply(Mutation::AddSection {
                kind: "awards".to_string(),
                title: None,
            })
            .unwrap_err();
        assert_eq!(err, DocumentError::InvalidKind("awards".to_string()));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_second_header_is_rejected() {
        let mut doc = Document::new();
        assert_eq!(
            doc.add_section(SectionKind::Header, None).unwrap_err(),
            DocumentError::PinnedSectionExists(SectionKind::Header)
        );
        assert_eq!(
            doc.add_section(SectionKind::Summary, None).unwrap_err(),
            DocumentError::PinnedSectionExists(SectionKind::Summary)
        );
    }

    #[test]
    fn test_multiple_unpinned_sections_of_one_kind_allowed() {
        let mut doc = Document::new();
        doc.add_section(SectionKind::Experience, Some("Volunteer Work"))
            .unwrap();
        let count = doc
            .sections()
            .iter()
            .filter(|s| s.kind == SectionKind::Experience)
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_remove_pinned_sections_rejected() {
        let mut doc = Document::new();
        for kind in [SectionKind::Header, SectionKind::Summary] {
            let id = section_id(&doc, kind);
            assert_eq!(
                doc.remove_section(&id).unwrap_err(),
                DocumentError::PinnedSectionRemoval(id)
            );
        }
        assert_eq!(doc.len(), 6);
    }

    #[test]
    fn test_remove_missing_section_reported() {
        let mut doc = Document::new();
        let err = doc.remove_section(&SectionId::from("nope-1")).unwrap_err();
        assert_eq!(err, DocumentError::SectionNotFound(SectionId::from("nope-1")));
    }

    #[test]
    fn test_remove_section_keeps_orders_contiguous() {
        let mut doc = Document::new();
        let education = section_id(&doc, SectionKind::Education);
        doc.remove_section(&education).unwrap();
        let orders: Vec<_> = doc.sections().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
        let kinds: Vec<_> = doc.sections().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Skills,
                SectionKind::Projects
            ]
        );
    }

    #[test]
    fn test_rename_touches_only_title() {
        let mut doc = Document::new();
        let id = section_id(&doc, SectionKind::Skills);
        let before = doc.section(&id).unwrap().clone();
        doc.rename_section(&id, "Toolbox").unwrap();
        let after = doc.section(&id).unwrap();
        assert_eq!(after.title, "Toolbox");
        assert_eq!(after.content, before.content);
        assert_eq!(after.order, before.order);
    }

    #[test]
    fn test_add_item_to_scalar_section_is_not_a_collection() {
        let mut doc = Document::new();
        let summary = section_id(&doc, SectionKind::Summary);
        assert_eq!(
            doc.add_item(&summary, SectionKind::Summary).unwrap_err(),
            DocumentError::NotACollection(SectionKind::Summary)
        );
    }

    #[test]
    fn test_add_item_of_other_kind_is_kind_mismatch() {
        let mut doc = Document::new();
        let skills = section_id(&doc, SectionKind::Skills);
        let err = doc.add_item(&skills, SectionKind::Experience).unwrap_err();
        assert_eq!(
            err,
            DocumentError::KindMismatch {
                expected: SectionKind::Skills,
                found: SectionKind::Experience
            }
        );
        assert!(doc.section(&skills).unwrap().content.is_empty());
    }

    #[test]
    fn test_update_item_field_and_missing_ids() {
        let mut doc = Document::new();
        let experience = section_id(&doc, SectionKind::Experience);
        let item = doc.add_item(&experience, SectionKind::Experience).unwrap();
        doc.update_item_field(&experience, &item, "company", "Acme".into())
            .unwrap();

        let Content::Experience(list) = &doc.section(&experience).unwrap().content else {
            panic!("expected experience content");
        };
        assert_eq!(list.items[0].fields.company, "Acme");

        assert_eq!(
            doc.update_item_field(&experience, &"item-999".into(), "company", "X".into())
                .unwrap_err(),
            DocumentError::ItemNotFound("item-999".into())
        );
        assert_eq!(
            doc.update_item_field(&"ghost-1".into(), &item, "company", "X".into())
                .unwrap_err(),
            DocumentError::SectionNotFound("ghost-1".into())
        );
    }

    #[test]
    fn test_update_language_proficiency() {
        let mut doc = Document::new();
        let languages = doc
            .add_section(SectionKind::Languages, None)
            .unwrap()
            .id
            .clone();
        let item = doc.add_item(&languages, SectionKind::Languages).unwrap();
        doc.update_item_field(&languages, &item, "proficiency", "Fluent".into())
            .unwrap();
        let Content::Languages(list) = &doc.section(&languages).unwrap().content else {
            panic!("expected languages content");
        };
        assert_eq!(list.items[0].fields.proficiency, Proficiency::Fluent);
    }

    #[test]
    fn test_removed_item_id_is_never_reused() {
        let mut doc = Document::new();
        let projects = section_id(&doc, SectionKind::Projects);
        let first = doc.add_item(&projects, SectionKind::Projects).unwrap();
        doc.remove_item(&projects, &first).unwrap();
        let second = doc.add_item(&projects, SectionKind::Projects).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_absent_item_reported() {
        let mut doc = Document::new();
        let projects = section_id(&doc, SectionKind::Projects);
        assert_eq!(
            doc.remove_item(&projects, &"item-404".into()).unwrap_err(),
            DocumentError::ItemNotFound("item-404".into())
        );
    }

    #[test]
    fn test_reorder_sections_applies_permutation() {
        let mut doc = Document::new();
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        ids.reverse();
        doc.reorder_sections(&ids).unwrap();
        let after: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        assert_eq!(after, ids);
        assert!(doc.invariants_hold());
    }

    #[test]
    fn test_reorder_sections_missing_id_is_invalid_permutation() {
        let mut doc = Document::new();
        let before = order_snapshot(&doc);
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        ids.pop();
        assert_eq!(
            doc.reorder_sections(&ids).unwrap_err(),
            DocumentError::InvalidPermutation
        );
        assert_eq!(order_snapshot(&doc), before);
    }

    #[test]
    fn test_reorder_sections_duplicate_or_unknown_id_rejected() {
        let mut doc = Document::new();
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        let mut duplicated = ids.clone();
        duplicated[5] = duplicated[0].clone();
        assert!(doc.reorder_sections(&duplicated).is_err());
        ids[5] = SectionId::from("projects-77");
        assert!(doc.reorder_sections(&ids).is_err());
    }

    #[test]
    fn test_set_section_content_kind_mismatch_rejected() {
        let mut doc = Document::new();
        let summary = section_id(&doc, SectionKind::Summary);
        let err = doc
            .set_section_content(&summary, Content::Custom(Default::default()))
            .unwrap_err();
        assert!(matches!(err, DocumentError::KindMismatch { .. }));
    }

    #[test]
    fn test_set_section_content_observes_incoming_item_ids() {
        let mut doc = Document::new();
        let skills = section_id(&doc, SectionKind::Skills);
        let content: Content = serde_json::from_value(serde_json::json!({
            "kind": "skills",
            "items": [{"id": "item-50", "category": "Languages", "items": ["Rust"]}]
        }))
        .unwrap();
        doc.set_section_content(&skills, content).unwrap();
        let next = doc.add_item(&skills, SectionKind::Skills).unwrap();
        assert_eq!(next.as_str(), "item-51");
        let ids = doc.section(&skills).unwrap().content.items().unwrap().item_ids();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_set_section_content_rejects_id_suffix_without_headroom() {
        let mut doc = Document::new();
        let skills = section_id(&doc, SectionKind::Skills);
        let before = doc.clone();
        let content: Content = serde_json::from_value(serde_json::json!({
            "kind": "skills",
            "items": [
                {"id": "item-1", "category": "Languages", "items": ["Rust"]},
                {"id": "item-18446744073709551615", "category": "Tools", "items": []}
            ]
        }))
        .unwrap();
        let err = doc.set_section_content(&skills, content).unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD_VALUE");
        assert_eq!(doc, before);

        let first = doc.add_item(&skills, SectionKind::Skills).unwrap();
        let second = doc.add_item(&skills, SectionKind::Skills).unwrap();
        assert_ne!(first, second);
        assert!(doc.invariants_hold());
    }

    #[test]
    fn test_reorder_items_via_mutation() {
        let mut doc = Document::new();
        let education = section_id(&doc, SectionKind::Education);
        let a = doc.add_item(&education, SectionKind::Education).unwrap();
        let b = doc.add_item(&education, SectionKind::Education).unwrap();
        doc.apply(Mutation::ReorderItems {
            section_id: education.clone(),
            item_ids: vec![b.clone(), a.clone()],
        })
        .unwrap();
        let items = doc.section(&education).unwrap().content.items().unwrap();
        assert_eq!(items.item_ids(), vec![b, a]);
    }

    #[test]
    fn test_languages_scenario_add_items_then_remove_section() {
        let mut doc = Document::new();
        let before = doc.len();
        let outcome = doc
            .apply(Mutation::AddSection {
                kind: "languages".to_string(),
                title: None,
            })
            .unwrap();
        let MutationOutcome::SectionAdded { section_id } = outcome else {
            panic!("expected section_added");
        };
        for _ in 0..2 {
            doc.apply(Mutation::AddItem {
                section_id: section_id.clone(),
                kind: "languages".to_string(),
            })
            .unwrap();
        }
        doc.apply(Mutation::RemoveSection { section_id }).unwrap();
        assert_eq!(doc.len(), before);
        assert!(doc.first_of_kind(SectionKind::Languages).is_none());
        assert!(doc.invariants_hold());

        let tree = to_render_tree(&doc, &TemplateDescriptor::default());
        assert!(tree
            .blocks
            .iter()
            .all(|block| block.kind != SectionKind::Languages));
    }

    #[test]
    fn test_mutation_sequence_keeps_invariants() {
        let mut doc = Document::new();
        let mut added = Vec::new();
        for kind in ["custom", "interests", "certifications", "experience"] {
            if let MutationOutcome::SectionAdded { section_id } = doc
                .apply(Mutation::AddSection {
                    kind: kind.to_string(),
                    title: None,
                })
                .unwrap()
            {
                added.push(section_id);
            }
        }
        doc.apply(Mutation::RemoveSection {
            section_id: added[1].clone(),
        })
        .unwrap();
        let mut ids: Vec<_> = doc.sections().iter().map(|s| s.id.clone()).collect();
        ids.rotate_left(3);
        doc.apply(Mutation::ReorderSections { section_ids: ids })
            .unwrap();
        let header = doc.header().unwrap().id.clone();
        assert!(doc.apply(Mutation::RemoveSection { section_id: header }).is_err());

        assert!(doc.invariants_hold());
        assert!(doc.header().is_some());
        assert!(doc.first_of_kind(SectionKind::Summary).is_some());
        assert_eq!(doc.len(), 9);
    }

    #[test]
    fn test_mutation_decodes_from_wire_json() {
        let json = serde_json::json!({
            "op": "update_item_field",
            "section_id": "skills-5",
            "item_id": "item-9",
            "field": "items",
            "value": ["Rust", "SQL"]
        });
        let mutation: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(
            mutation,
            Mutation::UpdateItemField {
                section_id: "skills-5".into(),
                item_id: "item-9".into(),
                field: "items".to_string(),
                value: FieldValue::List(vec!["Rust".to_string(), "SQL".to_string()]),
            }
        );
    }
}
