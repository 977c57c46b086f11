use crate::ui::markdown::{render_response, CodeBlock, RenderedResponse};

pub fn render_for_test(text: &str) -> RenderedResponse {
    render_response(text)
}

/// Replace every code block id in `html` with a fixed marker so two renders
/// of the same text can be compared byte for byte.
pub fn mask_ids(html: &str, blocks: &[CodeBlock]) -> String {
    blocks
        .iter()
        .enumerate()
        .fold(html.to_string(), |acc, (idx, block)| {
            acc.replace(block.id.as_str(), &format!("code-#{idx}"))
        })
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
