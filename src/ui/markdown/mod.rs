//! Assistant-response rendering.
//!
//! Response text is classified ([`classify`]) and then rendered to an HTML
//! fragment by the section structurer or by the flat code-block/inline
//! pipeline. All markup is produced through [`html::HtmlWriter`].

mod classify;
mod code;
pub mod html;
mod inline;
mod parser;
mod render;
mod sections;

#[cfg(test)]
mod tests;

pub use classify::{classify, ContentCategory};
pub use code::{
    extract_code_blocks, has_fenced_code, is_executable_language, CodeBlock, CodeBlockId,
    Segment, EXECUTABLE_LANGUAGES,
};
pub use inline::transform_inline;
pub use render::{render, render_response, CodeBlockSink, RenderedResponse};
pub use sections::{structure, Block, Section, SectionBody, SubBlock, Subsection};
