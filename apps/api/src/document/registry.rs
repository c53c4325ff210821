//! Section type registry: the single factory for kind-specific content shapes.
//!
//! Adding a section kind means extending `SectionKind`, `Content`, `NewItem`
//! and the two functions below; the exhaustive matches make the compiler
//! point at every other place that needs a decision.

use crate::document::content::{
    Content, HeaderContent, Item, ItemList, NewItem, TextContent,
};
use crate::document::{DocumentError, ItemId, SectionKind};

/// Returns the empty content value for `kind`: blank fields for scalar kinds,
/// an empty item list for collection kinds.
pub fn default_content(kind: SectionKind) -> Content {
    match kind {
        SectionKind::Header => Content::Header(HeaderContent::default()),
        SectionKind::Summary => Content::Summary(TextContent::default()),
        SectionKind::Custom => Content::Custom(TextContent::default()),
        SectionKind::Experience => Content::Experience(ItemList::default()),
        SectionKind::Education => Content::Education(ItemList::default()),
        SectionKind::Skills => Content::Skills(ItemList::default()),
        SectionKind::Projects => Content::Projects(ItemList::default()),
        SectionKind::Certifications => Content::Certifications(ItemList::default()),
        SectionKind::Languages => Content::Languages(ItemList::default()),
        SectionKind::Interests => Content::Interests(ItemList::default()),
    }
}

/// Builds a blank item of `kind` carrying `id`.
///
/// Fails with `NotACollection` for scalar kinds, which have no items.
pub fn new_item(kind: SectionKind, id: ItemId) -> Result<NewItem, DocumentError> {
    let item = match kind {
        SectionKind::Experience => NewItem::Experience(blank(id)),
        SectionKind::Education => NewItem::Education(blank(id)),
        SectionKind::Skills => NewItem::Skills(blank(id)),
        SectionKind::Projects => NewItem::Projects(blank(id)),
        SectionKind::Certifications => NewItem::Certifications(blank(id)),
        SectionKind::Languages => NewItem::Languages(blank(id)),
        SectionKind::Interests => NewItem::Interests(blank(id)),
        SectionKind::Header | SectionKind::Summary | SectionKind::Custom => {
            return Err(DocumentError::NotACollection(kind))
        }
    };
    Ok(item)
}

fn blank<T: Default>(id: ItemId) -> Item<T> {
    Item {
        id,
        fields: T::default(),
    }
}
