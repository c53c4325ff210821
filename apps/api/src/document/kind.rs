use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::DocumentError;

/// The closed set of section kinds a résumé can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Interests,
    Custom,
}

impl SectionKind {
    pub const ALL: [SectionKind; 10] = [
        SectionKind::Header,
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Interests,
        SectionKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Interests => "interests",
            SectionKind::Custom => "custom",
        }
    }

    /// Pinned sections exist at most once and can never be removed.
    pub fn is_pinned(&self) -> bool {
        matches!(self, SectionKind::Header | SectionKind::Summary)
    }

    /// Collection kinds hold an ordered list of items; the rest hold scalar fields.
    pub fn is_collection(&self) -> bool {
        !matches!(
            self,
            SectionKind::Header | SectionKind::Summary | SectionKind::Custom
        )
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            SectionKind::Header => "Personal Information",
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Languages => "Languages",
            SectionKind::Interests => "Interests",
            SectionKind::Custom => "Custom Section",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocumentError::InvalidKind(s.to_string()))
    }
}
