use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE_ID: &str = "modern-professional";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Modern,
    Professional,
    Creative,
}

/// Presentation policy applied at projection time. Never stored as document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub display_style: DisplayStyle,
    pub supports_photo: bool,
}

impl TemplateDescriptor {
    pub fn new(id: &str, name: &str, display_style: DisplayStyle, supports_photo: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            display_style,
            supports_photo,
        }
    }
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self::new(
            DEFAULT_TEMPLATE_ID,
            "Modern Professional",
            DisplayStyle::Modern,
            true,
        )
    }
}

/// The built-in template descriptors offered to editing sessions.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDescriptor>,
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                TemplateDescriptor::default(),
                TemplateDescriptor::new(
                    "creative-portfolio",
                    "Creative Portfolio",
                    DisplayStyle::Creative,
                    true,
                ),
                TemplateDescriptor::new(
                    "executive-elite",
                    "Executive Elite",
                    DisplayStyle::Professional,
                    true,
                ),
                TemplateDescriptor::new(
                    "minimalist-clean",
                    "Minimalist Clean",
                    DisplayStyle::Modern,
                    false,
                ),
            ],
        }
    }

    pub fn all(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Looks up `id`, falling back to the default template when absent or unknown.
    pub fn get_or_default(&self, id: Option<&str>) -> TemplateDescriptor {
        id.and_then(|id| self.get(id))
            .cloned()
            .unwrap_or_default()
    }
}
