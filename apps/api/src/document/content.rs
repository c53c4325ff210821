//! Section content shapes.
//!
//! `Content` is a closed tagged union keyed by section kind. Scalar kinds
//! (header, summary, custom) hold a flat record of named strings; collection
//! kinds hold an ordered `ItemList<T>` whose entry type `T` fixes the field set.
//! Collection operations are reached through the object-safe [`ItemCollection`]
//! trait so callers never match on the ten variants themselves.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentError, ItemId, SectionKind};

// ────────────────────────────────────────────────────────────────────────────
// Field values
// ────────────────────────────────────────────────────────────────────────────

/// A value written into a single named item field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::List(values) => values.join(", "),
        }
    }

    /// Lists pass through; text is split on commas, trimmed, blanks dropped.
    fn into_list(self) -> Vec<String> {
        match self {
            FieldValue::List(values) => values,
            FieldValue::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scalar content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderContent {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    /// Reference (URL) to an uploaded photo. Kept even when the active template hides it.
    pub photo: Option<String>,
}

impl HeaderContent {
    fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.title,
            &self.email,
            &self.phone,
            &self.location,
            &self.linkedin,
            &self.website,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
            && self.photo.as_deref().map_or(true, |p| p.trim().is_empty())
    }
}

/// Free text body used by summary and custom sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Collection entries
// ────────────────────────────────────────────────────────────────────────────

/// Field set of one collection kind.
pub trait Entry: Default {
    const KIND: SectionKind;

    /// Replaces one named field. Fails without touching `self` on an unknown
    /// field name or a value the field cannot hold.
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError>;
}

fn unknown_field(kind: SectionKind, field: &str) -> DocumentError {
    DocumentError::UnknownField {
        kind,
        field: field.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub location: String,
    pub description: String,
}

impl Entry for ExperienceEntry {
    const KIND: SectionKind = SectionKind::Experience;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        let slot = match field {
            "company" => &mut self.company,
            "position" => &mut self.position,
            "duration" => &mut self.duration,
            "location" => &mut self.location,
            "description" => &mut self.description,
            _ => return Err(unknown_field(Self::KIND, field)),
        };
        *slot = value.into_text();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub year: String,
    pub gpa: String,
    pub location: String,
}

impl Entry for EducationEntry {
    const KIND: SectionKind = SectionKind::Education;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        let slot = match field {
            "institution" => &mut self.institution,
            "degree" => &mut self.degree,
            "year" => &mut self.year,
            "gpa" => &mut self.gpa,
            "location" => &mut self.location,
            _ => return Err(unknown_field(Self::KIND, field)),
        };
        *slot = value.into_text();
        Ok(())
    }
}

/// One skills category and the skills listed under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

impl Entry for SkillGroup {
    const KIND: SectionKind = SectionKind::Skills;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        match field {
            "category" => self.category = value.into_text(),
            "items" => self.items = value.into_list(),
            _ => return Err(unknown_field(Self::KIND, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
    pub duration: String,
}

impl Entry for ProjectEntry {
    const KIND: SectionKind = SectionKind::Projects;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        let slot = match field {
            "name" => &mut self.name,
            "description" => &mut self.description,
            "technologies" => &mut self.technologies,
            "link" => &mut self.link,
            "duration" => &mut self.duration,
            _ => return Err(unknown_field(Self::KIND, field)),
        };
        *slot = value.into_text();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: String,
}

impl Entry for CertificationEntry {
    const KIND: SectionKind = SectionKind::Certifications;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        let slot = match field {
            "name" => &mut self.name,
            "issuer" => &mut self.issuer,
            "date" => &mut self.date,
            "link" => &mut self.link,
            _ => return Err(unknown_field(Self::KIND, field)),
        };
        *slot = value.into_text();
        Ok(())
    }
}

/// Fixed, ordered proficiency scale for spoken languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Fluent,
    Native,
}

impl Proficiency {
    pub const SCALE: [Proficiency; 5] = [
        Proficiency::Beginner,
        Proficiency::Intermediate,
        Proficiency::Advanced,
        Proficiency::Fluent,
        Proficiency::Native,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Beginner => "Beginner",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Advanced => "Advanced",
            Proficiency::Fluent => "Fluent",
            Proficiency::Native => "Native",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::SCALE
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    pub language: String,
    pub proficiency: Proficiency,
}

impl Entry for LanguageEntry {
    const KIND: SectionKind = SectionKind::Languages;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        match field {
            "language" => self.language = value.into_text(),
            "proficiency" => {
                let raw = value.into_text();
                self.proficiency =
                    Proficiency::parse(&raw).ok_or_else(|| DocumentError::InvalidFieldValue {
                        field: field.to_string(),
                        reason: format!("'{raw}' is not on the proficiency scale"),
                    })?;
            }
            _ => return Err(unknown_field(Self::KIND, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestEntry {
    pub interest: String,
}

impl Entry for InterestEntry {
    const KIND: SectionKind = SectionKind::Interests;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), DocumentError> {
        match field {
            "interest" => self.interest = value.into_text(),
            _ => return Err(unknown_field(Self::KIND, field)),
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Items and item lists
// ────────────────────────────────────────────────────────────────────────────

/// One identified entry inside a collection section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Item<T>>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> ItemList<T> {
    pub fn new(items: Vec<Item<T>>) -> Self {
        Self { items }
    }
}

/// Uniform view over any collection section's items.
pub trait ItemCollection {
    fn kind(&self) -> SectionKind;
    fn len(&self) -> usize;
    fn item_ids(&self) -> Vec<ItemId>;
    fn contains(&self, id: &ItemId) -> bool;
    fn remove_item(&mut self, id: &ItemId) -> Result<(), DocumentError>;
    fn set_item_field(
        &mut self,
        id: &ItemId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), DocumentError>;
    /// Reorders items to match `order`, which must be a permutation of the current ids.
    fn reorder(&mut self, order: &[ItemId]) -> Result<(), DocumentError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entry> ItemCollection for ItemList<T> {
    fn kind(&self) -> SectionKind {
        T::KIND
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    fn remove_item(&mut self, id: &ItemId) -> Result<(), DocumentError> {
        let index = self
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| DocumentError::ItemNotFound(id.clone()))?;
        self.items.remove(index);
        Ok(())
    }

    fn set_item_field(
        &mut self,
        id: &ItemId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), DocumentError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| DocumentError::ItemNotFound(id.clone()))?;
        item.fields.set_field(field, value)
    }

    fn reorder(&mut self, order: &[ItemId]) -> Result<(), DocumentError> {
        let current = self.item_ids();
        if !is_permutation(&current, order) {
            return Err(DocumentError::InvalidPermutation);
        }
        let mut remaining: Vec<Option<Item<T>>> = self.items.drain(..).map(Some).collect();
        for id in order {
            // is_permutation guarantees every id resolves exactly once
            if let Some(slot) = current.iter().position(|c| c == id) {
                if let Some(item) = remaining[slot].take() {
                    self.items.push(item);
                }
            }
        }
        Ok(())
    }
}

/// True when `proposed` holds exactly the ids in `current`, each once.
pub(crate) fn is_permutation<T: Eq + std::hash::Hash>(current: &[T], proposed: &[T]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let wanted: HashSet<&T> = current.iter().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    proposed
        .iter()
        .all(|id| wanted.contains(id) && seen.insert(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

/// Section content, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Header(HeaderContent),
    Summary(TextContent),
    Experience(ItemList<ExperienceEntry>),
    Education(ItemList<EducationEntry>),
    Skills(ItemList<SkillGroup>),
    Projects(ItemList<ProjectEntry>),
    Certifications(ItemList<CertificationEntry>),
    Languages(ItemList<LanguageEntry>),
    Interests(ItemList<InterestEntry>),
    Custom(TextContent),
}

/// A freshly identified, blank item produced by the registry for one collection kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewItem {
    Experience(Item<ExperienceEntry>),
    Education(Item<EducationEntry>),
    Skills(Item<SkillGroup>),
    Projects(Item<ProjectEntry>),
    Certifications(Item<CertificationEntry>),
    Languages(Item<LanguageEntry>),
    Interests(Item<InterestEntry>),
}

impl NewItem {
    pub fn id(&self) -> &ItemId {
        match self {
            NewItem::Experience(item) => &item.id,
            NewItem::Education(item) => &item.id,
            NewItem::Skills(item) => &item.id,
            NewItem::Projects(item) => &item.id,
            NewItem::Certifications(item) => &item.id,
            NewItem::Languages(item) => &item.id,
            NewItem::Interests(item) => &item.id,
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            NewItem::Experience(_) => SectionKind::Experience,
            NewItem::Education(_) => SectionKind::Education,
            NewItem::Skills(_) => SectionKind::Skills,
            NewItem::Projects(_) => SectionKind::Projects,
            NewItem::Certifications(_) => SectionKind::Certifications,
            NewItem::Languages(_) => SectionKind::Languages,
            NewItem::Interests(_) => SectionKind::Interests,
        }
    }
}

impl Content {
    pub fn kind(&self) -> SectionKind {
        match self {
            Content::Header(_) => SectionKind::Header,
            Content::Summary(_) => SectionKind::Summary,
            Content::Experience(_) => SectionKind::Experience,
            Content::Education(_) => SectionKind::Education,
            Content::Skills(_) => SectionKind::Skills,
            Content::Projects(_) => SectionKind::Projects,
            Content::Certifications(_) => SectionKind::Certifications,
            Content::Languages(_) => SectionKind::Languages,
            Content::Interests(_) => SectionKind::Interests,
            Content::Custom(_) => SectionKind::Custom,
        }
    }

    pub fn items(&self) -> Option<&dyn ItemCollection> {
        match self {
            Content::Experience(list) => Some(list),
            Content::Education(list) => Some(list),
            Content::Skills(list) => Some(list),
            Content::Projects(list) => Some(list),
            Content::Certifications(list) => Some(list),
            Content::Languages(list) => Some(list),
            Content::Interests(list) => Some(list),
            Content::Header(_) | Content::Summary(_) | Content::Custom(_) => None,
        }
    }

    pub fn items_mut(&mut self) -> Option<&mut dyn ItemCollection> {
        match self {
            Content::Experience(list) => Some(list),
            Content::Education(list) => Some(list),
            Content::Skills(list) => Some(list),
            Content::Projects(list) => Some(list),
            Content::Certifications(list) => Some(list),
            Content::Languages(list) => Some(list),
            Content::Interests(list) => Some(list),
            Content::Header(_) | Content::Summary(_) | Content::Custom(_) => None,
        }
    }

    /// Appends a registry-built item. The item kind must match the content kind.
    pub(crate) fn push_item(&mut self, item: NewItem) -> Result<(), DocumentError> {
        match (self, item) {
            (Content::Experience(list), NewItem::Experience(item)) => list.items.push(item),
            (Content::Education(list), NewItem::Education(item)) => list.items.push(item),
            (Content::Skills(list), NewItem::Skills(item)) => list.items.push(item),
            (Content::Projects(list), NewItem::Projects(item)) => list.items.push(item),
            (Content::Certifications(list), NewItem::Certifications(item)) => {
                list.items.push(item)
            }
            (Content::Languages(list), NewItem::Languages(item)) => list.items.push(item),
            (Content::Interests(list), NewItem::Interests(item)) => list.items.push(item),
            (content, item) => {
                return Err(DocumentError::KindMismatch {
                    expected: content.kind(),
                    found: item.kind(),
                })
            }
        }
        Ok(())
    }

    /// Empty content is suppressed from the render tree: no non-blank scalar value, or no items.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Header(header) => header.is_blank(),
            Content::Summary(body) | Content::Custom(body) => body.text.trim().is_empty(),
            _ => self.items().map_or(true, |items| items.is_empty()),
        }
    }

    /// Rejects content whose item ids repeat within the list.
    pub(crate) fn check_unique_item_ids(&self) -> Result<(), DocumentError> {
        let Some(items) = self.items() else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for id in items.item_ids() {
            if !seen.insert(id.clone()) {
                return Err(DocumentError::DuplicateItemId(id));
            }
        }
        Ok(())
    }
}
