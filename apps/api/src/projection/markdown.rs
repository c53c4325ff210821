use crate::projection::render::{BlockBody, HeaderBlock, RenderTree};

/// Plain-text realization of a render tree, used for the markdown preview.
pub fn render_markdown(tree: &RenderTree) -> String {
    let mut md = String::new();
    for block in &tree.blocks {
        match &block.body {
            BlockBody::Header(header) => push_header(&mut md, header),
            body => {
                md.push_str(&format!("## {}\n\n", block.title));
                push_body(&mut md, body);
            }
        }
        md.push('\n');
    }
    md.truncate(md.trim_end().len());
    md.push('\n');
    md
}

fn push_header(md: &mut String, header: &HeaderBlock) {
    md.push_str(&format!("# {}\n", header.name));
    md.push_str(&format!("**{}**\n", header.title));
    if !header.contacts.is_empty() {
        let line = header
            .contacts
            .iter()
            .map(|c| {
                if c.label == c.value {
                    c.value.clone()
                } else {
                    format!("[{}]({})", c.label, c.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        md.push_str(&format!("\n{line}\n"));
    }
    if let Some(photo) = &header.photo {
        md.push_str(&format!("\n![Photo]({photo})\n"));
    }
}

fn push_body(md: &mut String, body: &BlockBody) {
    match body {
        BlockBody::Header(header) => push_header(md, header),
        BlockBody::Paragraph { text } => md.push_str(&format!("{text}\n")),
        BlockBody::Entries { entries } => {
            for entry in entries {
                let mut heading = format!("### {}", entry.heading);
                if let Some(sub) = &entry.subheading {
                    heading.push_str(&format!(" · {sub}"));
                }
                md.push_str(&heading);
                md.push('\n');
                if !entry.aside.is_empty() {
                    md.push_str(&format!("*{}*\n", entry.aside.join(" | ")));
                }
                if let Some(detail) = &entry.detail {
                    md.push_str(&format!("\n{detail}\n"));
                }
                if let Some(link) = &entry.link {
                    md.push_str(&format!("\n<{link}>\n"));
                }
                md.push('\n');
            }
        }
        BlockBody::SkillGroups { groups } => {
            for group in groups {
                if group.category.is_empty() {
                    md.push_str(&format!("- {}\n", group.skills.join(", ")));
                } else {
                    md.push_str(&format!(
                        "- **{}:** {}\n",
                        group.category,
                        group.skills.join(", ")
                    ));
                }
            }
        }
        BlockBody::Languages { languages } => {
            for line in languages {
                md.push_str(&format!(
                    "- {} ({})\n",
                    line.language,
                    line.proficiency.as_str()
                ));
            }
        }
        BlockBody::Tags { tags } => md.push_str(&format!("{}\n", tags.join(" · "))),
    }
}
