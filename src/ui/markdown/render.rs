use super::classify::{classify, ContentCategory};
use super::code::{extract_code_blocks, write_code_block, CodeBlock, Segment};
use super::html::{Attr, HtmlWriter, RenderedHtml, Tag};
use super::inline::{write_prose, write_spans};
use super::sections::{structure, Block, SectionBody, SubBlock};
use std::panic;
use tracing::warn;

/// Receives every code block a render pass produces, so copy/run handlers
/// can be looked up by id once the fragment is on screen.
pub trait CodeBlockSink {
    fn register(&mut self, block: &CodeBlock);
}

impl CodeBlockSink for Vec<CodeBlock> {
    fn register(&mut self, block: &CodeBlock) {
        self.push(block.clone());
    }
}

#[derive(Clone, Debug)]
pub struct RenderedResponse {
    pub category: ContentCategory,
    pub html: String,
    pub code_blocks: Vec<CodeBlock>,
}

/// Render assistant text to a safe HTML fragment, registering its code
/// blocks with `sink`.
pub fn render(text: &str, sink: &mut dyn CodeBlockSink) -> RenderedHtml {
    let rendered = render_response(text);
    for block in &rendered.code_blocks {
        sink.register(block);
    }
    RenderedHtml::from_writer(rendered.html)
}

/// Classify and render `text`. Rendering the same text twice produces the
/// same markup apart from the freshly generated code block ids. A fault
/// inside a parser degrades to the escaped plain-text rendering instead of
/// propagating.
pub fn render_response(text: &str) -> RenderedResponse {
    let category = classify(text);
    match panic::catch_unwind(|| render_as(text, category)) {
        Ok((html, code_blocks)) => RenderedResponse {
            category,
            html,
            code_blocks,
        },
        Err(_) => {
            warn!(%category, len = text.len(), "renderer failed; falling back to plain text");
            RenderedResponse {
                category: ContentCategory::Plain,
                html: render_plain(text),
                code_blocks: Vec::new(),
            }
        }
    }
}

fn render_as(text: &str, category: ContentCategory) -> (String, Vec<CodeBlock>) {
    match category {
        ContentCategory::Plain => (render_plain(text), Vec::new()),
        ContentCategory::Code | ContentCategory::Markdown => {
            let mut blocks = Vec::new();
            let mut w = HtmlWriter::new();
            open_response(&mut w, category);
            write_flat(&mut w, text, &mut blocks);
            w.close(Tag::Div);
            (w.finish(), blocks)
        }
        ContentCategory::Structured => {
            let mut blocks = Vec::new();
            let mut w = HtmlWriter::new();
            open_response(&mut w, category);
            write_structured(&mut w, text, &mut blocks);
            w.close(Tag::Div);
            (w.finish(), blocks)
        }
    }
}

fn open_response(w: &mut HtmlWriter, category: ContentCategory) {
    let class = format!("response response-{category}");
    w.open(Tag::Div, &[(Attr::Class, class.as_str())]);
}

fn render_plain(text: &str) -> String {
    let mut w = HtmlWriter::new();
    open_response(&mut w, ContentCategory::Plain);
    w.element(Tag::Div, &[(Attr::Class, "plain-text")], text);
    w.close(Tag::Div);
    w.finish()
}

/// Code blocks first, then the inline transformer on the prose between them.
fn write_flat(w: &mut HtmlWriter, text: &str, blocks: &mut Vec<CodeBlock>) {
    for segment in extract_code_blocks(text) {
        match segment {
            Segment::Prose(prose) => write_prose(w, prose),
            Segment::Code(block) => {
                write_code_block(w, &block);
                blocks.push(block);
            }
        }
    }
}

fn write_structured(w: &mut HtmlWriter, text: &str, blocks: &mut Vec<CodeBlock>) {
    for block in structure(text) {
        match block {
            Block::Content(content) => write_content_block(w, &content, blocks),
            Block::Section(section) => {
                w.open(Tag::Section, &[(Attr::Class, "response-section")]);
                w.open(Tag::H3, &[(Attr::Class, "section-heading")]);
                write_spans(w, &section.heading);
                w.close(Tag::H3);
                w.open(Tag::Div, &[(Attr::Class, "section-body")]);
                match section.body {
                    SectionBody::Text(body) => write_flat(w, &body, blocks),
                    SectionBody::Nested(items) => {
                        for item in items {
                            match item {
                                SubBlock::Content(content) => {
                                    write_content_block(w, &content, blocks)
                                }
                                SubBlock::Subsection(sub) => {
                                    w.open(Tag::Div, &[(Attr::Class, "subsection")]);
                                    w.open(Tag::H4, &[(Attr::Class, "subsection-heading")]);
                                    write_spans(w, &sub.heading);
                                    w.close(Tag::H4);
                                    w.open(Tag::Div, &[(Attr::Class, "subsection-body")]);
                                    write_flat(w, &sub.body, blocks);
                                    w.close(Tag::Div);
                                    w.close(Tag::Div);
                                }
                            }
                        }
                    }
                }
                w.close(Tag::Div);
                w.close(Tag::Section);
            }
        }
    }
}

fn write_content_block(w: &mut HtmlWriter, content: &str, blocks: &mut Vec<CodeBlock>) {
    w.open(Tag::Div, &[(Attr::Class, "content-block")]);
    write_flat(w, content, blocks);
    w.close(Tag::Div);
}
