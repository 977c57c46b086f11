//! Heading-delimited responses.
//!
//! A bold span at the start of a line opens a section; within a section
//! body, each bold-italic span opens a subsection. Nesting stops at two
//! levels: subsection bodies are leaf text and any further markers in them
//! are left to the inline transformer.

use super::parser::{
    clean_heading, emphasis_at, emphasis_starts, line_heading_starts, strip_heading_colon,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Text before the first heading.
    Content(String),
    Section(Section),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    Nested(Vec<SubBlock>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubBlock {
    /// Section text before its first subsection.
    Content(String),
    Subsection(Subsection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subsection {
    pub heading: String,
    pub body: String,
}

/// Split `text` into its section tree. Every character of the input other
/// than heading delimiters, the colon after a heading and surrounding
/// whitespace ends up in exactly one heading or body, in input order.
pub fn structure(text: &str) -> Vec<Block> {
    let starts = line_heading_starts(text);
    let mut blocks = Vec::new();

    let lead_end = starts.first().copied().unwrap_or(text.len());
    let lead = text[..lead_end].trim();
    if !lead.is_empty() {
        blocks.push(Block::Content(lead.to_string()));
    }

    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(text.len());
        let segment = &text[start..end];
        match emphasis_at(segment, 0) {
            Some(span) => blocks.push(Block::Section(Section {
                heading: clean_heading(&segment[span.inner.clone()]),
                body: section_body(strip_heading_colon(&segment[span.end..])),
            })),
            None => blocks.push(Block::Content(segment.trim().to_string())),
        }
    }

    blocks
}

fn section_body(rest: &str) -> SectionBody {
    let starts = emphasis_starts(rest, 3);
    if starts.is_empty() {
        return SectionBody::Text(rest.trim().to_string());
    }

    let mut items = Vec::new();
    let lead = rest[..starts[0]].trim();
    if !lead.is_empty() {
        items.push(SubBlock::Content(lead.to_string()));
    }

    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(rest.len());
        let segment = &rest[start..end];
        match emphasis_at(segment, 0) {
            Some(span) => items.push(SubBlock::Subsection(Subsection {
                heading: clean_heading(&segment[span.inner.clone()]),
                body: strip_heading_colon(&segment[span.end..]).trim().to_string(),
            })),
            None => items.push(SubBlock::Content(segment.trim().to_string())),
        }
    }

    SectionBody::Nested(items)
}
