// Prompt text for section content generation.

/// System prompt shared by every section generation request.
pub const SECTION_TEXT_SYSTEM: &str = "You are an experienced resume writer. \
    Write concise, specific resume copy in the first person without pronouns. \
    Respond with the section text only: no headings, no markdown, no quotes, \
    no explanations.";

/// Summary prompt. Replace `{context}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a professional summary of 2-4 sentences \
    for a resume. Lead with the candidate's role and years of experience, then their \
    strongest skills and a concrete achievement.\n\nCandidate context: {context}";

/// Custom section prompt. Replace `{context}` before sending.
pub const CUSTOM_PROMPT_TEMPLATE: &str = "Write a short resume section body of at most \
    4 sentences.\n\nThe section is about: {context}";

pub fn build_section_prompt(template: &str, context: &str) -> String {
    template.replace("{context}", context.trim())
}
