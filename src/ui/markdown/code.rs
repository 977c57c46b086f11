use super::html::{Attr, HtmlWriter, Tag};
use crate::utils::random::random_urlsafe;
use memchr::memmem;
use std::fmt;

const FENCE: &str = "```";
const DEFAULT_LANGUAGE: &str = "text";
const ID_PREFIX: &str = "code-";

/// Languages whose code blocks get a run action.
pub const EXECUTABLE_LANGUAGES: [&str; 6] = ["javascript", "js", "python", "py", "html", "css"];

pub fn is_executable_language(language: &str) -> bool {
    EXECUTABLE_LANGUAGES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(language))
}

/// Opaque identifier of a rendered code block. Ids are random tokens, so
/// blocks from separately rendered responses never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeBlockId(String);

impl CodeBlockId {
    pub fn generate() -> Self {
        Self(format!("{ID_PREFIX}{}", random_urlsafe(12)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CodeBlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct CodeBlock {
    pub id: CodeBlockId,
    pub language: String,
    pub raw_source: String,
    pub executable: bool,
}

impl CodeBlock {
    fn new(language: Option<&str>, source: &str) -> Self {
        let language = language
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();
        Self {
            id: CodeBlockId::generate(),
            executable: is_executable_language(&language),
            raw_source: source.to_string(),
            language,
        }
    }
}

/// A terminated fenced region located in some text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct FenceMatch<'a> {
    pub(super) start: usize,
    pub(super) end: usize,
    pub(super) language: Option<&'a str>,
    pub(super) body: &'a str,
}

fn is_language_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#' | '.')
}

/// Find the first terminated fence at or after `from`. An opening fence
/// with no closing marker is not a code region.
pub(super) fn find_fence(text: &str, from: usize) -> Option<FenceMatch<'_>> {
    let finder = memmem::Finder::new(FENCE);
    let start = from + finder.find(&text.as_bytes()[from..])?;
    let after_open = start + FENCE.len();

    let tail = &text[after_open..];
    let lang_len = tail
        .find(|c: char| !is_language_char(c))
        .unwrap_or(tail.len());
    let language = (lang_len > 0).then(|| &tail[..lang_len]);

    let mut body_start = after_open + lang_len;
    let rest = &text[body_start..];
    let padding = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let rest_after_padding = &rest[padding..];
    if let Some(stripped) = rest_after_padding
        .strip_prefix("\r\n")
        .or_else(|| rest_after_padding.strip_prefix('\n'))
    {
        body_start = text.len() - stripped.len();
    } else {
        body_start += padding;
    }

    let close = body_start + finder.find(&text.as_bytes()[body_start..])?;
    let raw_body = &text[body_start..close];
    let body = raw_body
        .strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(raw_body);

    Some(FenceMatch {
        start,
        end: close + FENCE.len(),
        language,
        body,
    })
}

pub fn has_fenced_code(text: &str) -> bool {
    find_fence(text, 0).is_some()
}

/// Text split around its fenced code regions, in source order.
#[derive(Clone, Debug)]
pub enum Segment<'a> {
    Prose(&'a str),
    Code(CodeBlock),
}

/// Split `text` into prose and code blocks. Each terminated fence becomes
/// one [`CodeBlock`] with a fresh id; the prose between fences is returned
/// untouched so the inline transformer never sees code contents.
pub fn extract_code_blocks(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    while let Some(fence) = find_fence(text, cursor) {
        if fence.start > cursor {
            segments.push(Segment::Prose(&text[cursor..fence.start]));
        }
        segments.push(Segment::Code(CodeBlock::new(fence.language, fence.body)));
        cursor = fence.end;
    }
    if cursor < text.len() {
        segments.push(Segment::Prose(&text[cursor..]));
    }
    segments
}

/// Emit the interactive block: a header with the language label and the
/// copy (and, for allow-listed languages, run) controls, then the escaped
/// source under the block id.
pub(super) fn write_code_block(w: &mut HtmlWriter, block: &CodeBlock) {
    let id = block.id.as_str();
    let language_class = format!("language-{}", block.language);

    w.open(
        Tag::Div,
        &[
            (Attr::Class, "code-block"),
            (Attr::DataCodeId, id),
            (Attr::DataLanguage, block.language.as_str()),
        ],
    );
    w.open(Tag::Div, &[(Attr::Class, "code-header")]);
    w.element(Tag::Span, &[(Attr::Class, "code-language")], &block.language);
    w.element(
        Tag::Button,
        &[
            (Attr::Type, "button"),
            (Attr::Class, "code-action code-copy"),
            (Attr::DataAction, "copy"),
            (Attr::DataCodeId, id),
            (Attr::Title, "Copy code"),
        ],
        "Copy",
    );
    if block.executable {
        w.element(
            Tag::Button,
            &[
                (Attr::Type, "button"),
                (Attr::Class, "code-action code-run"),
                (Attr::DataAction, "run"),
                (Attr::DataCodeId, id),
                (Attr::Title, "Run code"),
            ],
            "Run",
        );
    }
    w.close(Tag::Div);
    w.open(Tag::Pre, &[(Attr::Class, "code-body")]);
    w.element(
        Tag::Code,
        &[(Attr::Id, id), (Attr::Class, language_class.as_str())],
        &block.raw_source,
    );
    w.close(Tag::Pre);
    w.close(Tag::Div);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn code_blocks(text: &str) -> Vec<CodeBlock> {
        extract_code_blocks(text)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Code(block) => Some(block),
                Segment::Prose(_) => None,
            })
            .collect()
    }

    #[test]
    fn fence_with_language_tag() {
        let fence = find_fence("see ```rust\nfn main() {}\n``` done", 0).expect("fence");
        assert_eq!(fence.start, 4);
        assert_eq!(fence.language, Some("rust"));
        assert_eq!(fence.body, "fn main() {}");
    }

    #[test]
    fn fence_without_language_defaults_to_text() {
        let blocks = code_blocks("```\nplain\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "text");
        assert!(!blocks[0].executable);
    }

    #[test]
    fn empty_body_is_a_legal_block() {
        let blocks = code_blocks("``````");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw_source, "");
    }

    #[test]
    fn unterminated_fence_is_not_code() {
        assert!(find_fence("```js\nconsole.log(1)", 0).is_none());
        let segments = extract_code_blocks("before ```js\nlet x;");
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0], Segment::Prose("before ```js\nlet x;")));
    }

    #[test]
    fn n_fences_yield_n_distinct_ids() {
        let text = "a\n```py\nprint(1)\n```\nb\n```js\nx\n```\n```\ny\n```\nc";
        let blocks = code_blocks(text);
        assert_eq!(blocks.len(), 3);
        let ids: HashSet<_> = blocks.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn executable_check_is_case_insensitive() {
        assert!(is_executable_language("Python"));
        assert!(is_executable_language("JS"));
        assert!(is_executable_language("css"));
        assert!(!is_executable_language("ruby"));
        assert!(!is_executable_language("text"));
    }

    #[test]
    fn source_is_escaped_not_interpreted() {
        let blocks = code_blocks("```html\n<script>alert('x')</script>\n```");
        let mut w = HtmlWriter::new();
        write_code_block(&mut w, &blocks[0]);
        let html = w.finish();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("data-action=\"run\""));
        assert!(html.contains(&format!("<code id=\"{}\"", blocks[0].id)));
    }

    #[test]
    fn non_executable_block_has_no_run_button() {
        let blocks = code_blocks("```ruby\nputs 1\n```");
        let mut w = HtmlWriter::new();
        write_code_block(&mut w, &blocks[0]);
        let html = w.finish();
        assert!(html.contains("data-action=\"copy\""));
        assert!(!html.contains("data-action=\"run\""));
    }

    #[test]
    fn prose_around_fences_is_preserved() {
        let segments = extract_code_blocks("intro\n```\nx\n```\noutro");
        assert!(matches!(segments[0], Segment::Prose("intro\n")));
        assert!(matches!(segments[1], Segment::Code(_)));
        assert!(matches!(segments[2], Segment::Prose("\noutro")));
    }
}
