use super::code::has_fenced_code;
use super::parser::{emphasis_starts, DelimiterIndex};
use std::fmt;

/// Parsing strategy for a response, derived from its text alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Code,
    Structured,
    Markdown,
    Plain,
}

impl ContentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentCategory::Code => "code",
            ContentCategory::Structured => "structured",
            ContentCategory::Markdown => "markdown",
            ContentCategory::Plain => "plain",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify response text. First match wins: a terminated fence makes it
/// code; a line-leading bold heading followed later by a bold-italic run
/// makes it structured; any other emphasis or inline code makes it
/// markdown; everything else is plain.
pub fn classify(text: &str) -> ContentCategory {
    if has_fenced_code(text) {
        return ContentCategory::Code;
    }
    let index = DelimiterIndex::new(text);
    if has_structured_headings(text, &index) {
        return ContentCategory::Structured;
    }
    if index.has_inline_markup() {
        return ContentCategory::Markdown;
    }
    ContentCategory::Plain
}

fn has_structured_headings(text: &str, index: &DelimiterIndex<'_>) -> bool {
    let Some(&first) = index.line_heading_starts().first() else {
        return false;
    };
    let Some(heading) = index.emphasis_at(first) else {
        return false;
    };
    !emphasis_starts(&text[heading.end..], 3).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_takes_precedence() {
        assert_eq!(
            classify("Explain **bold** and ```js\nconsole.log(1)\n```"),
            ContentCategory::Code
        );
        assert_eq!(
            classify("**A:** x ***B:*** y\n```\ncode\n```"),
            ContentCategory::Code
        );
    }

    #[test]
    fn heading_then_subheading_is_structured() {
        assert_eq!(classify("**A:** x ***B:*** y"), ContentCategory::Structured);
        assert_eq!(
            classify("Intro\n**Overview**\ntext\n***Detail***\nmore"),
            ContentCategory::Structured
        );
    }

    #[test]
    fn subheading_before_heading_is_not_structured() {
        assert_eq!(classify("***B*** then\n**A**"), ContentCategory::Markdown);
    }

    #[test]
    fn mid_line_bold_is_not_a_heading() {
        assert_eq!(
            classify("Use **bold** and ***emphasis*** here"),
            ContentCategory::Markdown
        );
    }

    #[test]
    fn inline_markup_is_markdown() {
        assert_eq!(classify("some *italic* text"), ContentCategory::Markdown);
        assert_eq!(classify("call `f()`"), ContentCategory::Markdown);
    }

    #[test]
    fn everything_else_is_plain() {
        assert_eq!(classify("Paris is the capital."), ContentCategory::Plain);
        assert_eq!(classify(""), ContentCategory::Plain);
        assert_eq!(classify("```js\nunterminated"), ContentCategory::Plain);
        assert_eq!(classify("****text****"), ContentCategory::Plain);
        assert_eq!(classify("<script>x</script>"), ContentCategory::Plain);
    }

    #[test]
    fn classification_is_deterministic_on_odd_input() {
        let inputs = [
            "*", "**", "***", "`", "``", "```", "*`*`", "**\n\n**", "é*ü*", "\u{0}*a*",
        ];
        for input in inputs {
            assert_eq!(classify(input), classify(input), "input {input:?}");
        }
        assert_eq!(classify("é*ü*"), ContentCategory::Markdown);
    }
}
