use super::html::{Attr, HtmlWriter, Tag};
use super::parser::{run_len, DelimiterIndex};

/// Render prose to HTML: paragraphs at blank lines, `<br>` at single
/// newlines, and emphasis/inline-code spans. Fenced code must already have
/// been split out by [`super::code::extract_code_blocks`].
pub fn transform_inline(text: &str) -> String {
    let mut w = HtmlWriter::new();
    write_prose(&mut w, text);
    w.finish()
}

pub(super) fn write_prose(w: &mut HtmlWriter, text: &str) {
    let normalized = text.replace("\r\n", "\n");
    for paragraph in paragraphs(&normalized) {
        w.open(Tag::P, &[]);
        write_spans(w, &paragraph);
        w.close(Tag::P);
    }
}

fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Inline spans of a single paragraph (or heading). Delimiter runs that do
/// not form a span are written as literal text.
pub(super) fn write_spans(w: &mut HtmlWriter, text: &str) {
    let bytes = text.as_bytes();
    let index = DelimiterIndex::new(text);
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let span = match bytes[i] {
            b'`' => index.inline_code_at(i),
            b'*' => index.emphasis_at(i),
            _ => {
                i += 1;
                continue;
            }
        };

        let Some(span) = span else {
            i += run_len(bytes, i, bytes[i]);
            continue;
        };

        write_text_with_breaks(w, &text[plain_start..span.start]);
        let inner = &text[span.inner.clone()];
        if bytes[i] == b'`' {
            w.element(Tag::Code, &[(Attr::Class, "inline-code")], inner);
        } else {
            match span.level {
                3 => {
                    w.open(Tag::Strong, &[]).open(Tag::Em, &[]);
                    write_spans(w, inner);
                    w.close(Tag::Em).close(Tag::Strong);
                }
                2 => {
                    w.open(Tag::Strong, &[]);
                    write_spans(w, inner);
                    w.close(Tag::Strong);
                }
                _ => {
                    w.open(Tag::Em, &[]);
                    write_spans(w, inner);
                    w.close(Tag::Em);
                }
            }
        }
        i = span.end;
        plain_start = i;
    }

    write_text_with_breaks(w, &text[plain_start..]);
}

fn write_text_with_breaks(w: &mut HtmlWriter, text: &str) {
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            w.void(Tag::Br);
        }
        w.text(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_italic_wins_over_bold_and_italic() {
        assert_eq!(
            transform_inline("***both*** **bold** *it*"),
            "<p><strong><em>both</em></strong> <strong>bold</strong> <em>it</em></p>"
        );
    }

    #[test]
    fn nested_emphasis_inside_bold() {
        assert_eq!(
            transform_inline("**bold *and* more**"),
            "<p><strong>bold <em>and</em> more</strong></p>"
        );
    }

    #[test]
    fn inline_code_contents_are_not_formatted() {
        assert_eq!(
            transform_inline("run `a **b** <c>` now"),
            "<p>run <code class=\"inline-code\">a **b** &lt;c&gt;</code> now</p>"
        );
    }

    #[test]
    fn paragraphs_and_line_breaks() {
        assert_eq!(
            transform_inline("one\ntwo\n\nthree\r\n\r\n\r\nfour"),
            "<p>one<br>two</p><p>three</p><p>four</p>"
        );
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        assert_eq!(
            transform_inline("2 * 3 and **open and `tick"),
            "<p>2 * 3 and **open and `tick</p>"
        );
        assert_eq!(transform_inline("****text****"), "<p>****text****</p>");
    }

    #[test]
    fn angle_brackets_are_escaped_everywhere() {
        let html = transform_inline("<script>alert(1)</script> **<b>x</b>**");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<strong>&lt;b&gt;x&lt;/b&gt;</strong>"));
    }

    #[test]
    fn blank_input_renders_nothing() {
        assert_eq!(transform_inline("  \n \n"), "");
    }
}
