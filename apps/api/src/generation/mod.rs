// AI text generation for scalar text sections (summary, custom).
// The provider call goes through llm_client; generated text is returned
// untouched and applied by the caller as an ordinary content replacement.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use tracing::info;

use crate::document::SectionKind;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use prompts::{
    build_section_prompt, CUSTOM_PROMPT_TEMPLATE, SECTION_TEXT_SYSTEM, SUMMARY_PROMPT_TEMPLATE,
};

/// Whether generated text can be applied to sections of `kind`.
pub fn accepts_generated_text(kind: SectionKind) -> bool {
    matches!(kind, SectionKind::Summary | SectionKind::Custom)
}

/// Default hint used when the caller does not supply one.
pub fn default_hint(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Summary => "professional summary",
        _ => kind.default_title(),
    }
}

/// Text generation backend. Carried in `AppState` as `Arc<dyn ContentGenerator>`.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, kind: SectionKind, context_hint: &str) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmContentGenerator: Anthropic-backed implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, kind: SectionKind, context_hint: &str) -> Result<String, AppError> {
        let template = match kind {
            SectionKind::Summary => SUMMARY_PROMPT_TEMPLATE,
            SectionKind::Custom => CUSTOM_PROMPT_TEMPLATE,
            other => {
                return Err(AppError::Validation(format!(
                    "Text generation is not available for '{other}' sections"
                )))
            }
        };
        let prompt = build_section_prompt(template, context_hint);
        let text = self.llm.call_text(&prompt, SECTION_TEXT_SYSTEM).await?;
        info!("Generated {} chars of {kind} text", text.len());
        Ok(text)
    }
}
