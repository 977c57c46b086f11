//! Delimiter scanning shared by the classifier, the inline transformer and
//! the section structurer.
//!
//! Emphasis is matched on asterisk runs of an exact length: a run of three
//! opens bold-italic, two bold, one italic, and the closer must be a run of
//! the same length. Runs of four or more asterisks are literal text. An
//! opener must be followed by a non-space character, a closer preceded by
//! one, and a span never crosses a blank line.

use memchr::{memchr, memchr2, memchr_iter};
use std::ops::Range;

pub(super) const MAX_EMPHASIS_RUN: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct DelimitedSpan {
    pub(super) start: usize,
    pub(super) inner: Range<usize>,
    pub(super) end: usize,
    /// Number of delimiter characters on each side.
    pub(super) level: usize,
}

pub(super) fn run_len(bytes: &[u8], pos: usize, delim: u8) -> usize {
    bytes[pos..].iter().take_while(|&&b| b == delim).count()
}

/// Paragraph breaks and closing delimiter runs of one text, collected in a
/// single pass. Span lookups are then binary searches instead of rescans,
/// so scanning a whole text stays close to linear in its length.
pub(super) struct DelimiterIndex<'a> {
    text: &'a str,
    /// Newlines that are followed by a blank line.
    breaks: Vec<usize>,
    /// Asterisk runs of exactly `level + 1` preceded by a non-space.
    closers: [Vec<usize>; MAX_EMPHASIS_RUN],
    /// Single backticks.
    ticks: Vec<usize>,
}

impl<'a> DelimiterIndex<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        let bytes = text.as_bytes();

        let mut breaks = Vec::new();
        for nl in memchr_iter(b'\n', bytes) {
            let rest = &bytes[nl + 1..];
            let line_end = memchr(b'\n', rest).unwrap_or(rest.len());
            if line_end < rest.len() && rest[..line_end].iter().all(u8::is_ascii_whitespace) {
                breaks.push(nl);
            }
        }

        let mut closers: [Vec<usize>; MAX_EMPHASIS_RUN] = Default::default();
        let mut ticks = Vec::new();
        let mut i = 0;
        while let Some(offset) = memchr2(b'*', b'`', &bytes[i..]) {
            let pos = i + offset;
            let delim = bytes[pos];
            let len = run_len(bytes, pos, delim);
            if delim == b'`' {
                if len == 1 {
                    ticks.push(pos);
                }
            } else if len <= MAX_EMPHASIS_RUN && pos > 0 && !bytes[pos - 1].is_ascii_whitespace()
            {
                closers[len - 1].push(pos);
            }
            i = pos + len;
        }

        Self {
            text,
            breaks,
            closers,
            ticks,
        }
    }

    /// Offset of the next blank line at or after `from`, or the end of the
    /// text.
    pub(super) fn paragraph_end(&self, from: usize) -> usize {
        first_at_or_after(&self.breaks, from).unwrap_or(self.text.len())
    }

    /// Emphasis span whose opening run starts exactly at `pos`.
    pub(super) fn emphasis_at(&self, pos: usize) -> Option<DelimitedSpan> {
        let bytes = self.text.as_bytes();
        if bytes.get(pos) != Some(&b'*') || (pos > 0 && bytes[pos - 1] == b'*') {
            return None;
        }
        let level = run_len(bytes, pos, b'*');
        if level > MAX_EMPHASIS_RUN {
            return None;
        }
        let inner_start = pos + level;
        match bytes.get(inner_start) {
            Some(b) if !b.is_ascii_whitespace() => {}
            _ => return None,
        }

        let limit = self.paragraph_end(inner_start);
        let closer = first_at_or_after(&self.closers[level - 1], inner_start)
            .filter(|&candidate| candidate < limit)?;
        Some(DelimitedSpan {
            start: pos,
            inner: inner_start..closer,
            end: closer + level,
            level,
        })
    }

    /// Inline code span (single backticks) starting exactly at `pos`.
    pub(super) fn inline_code_at(&self, pos: usize) -> Option<DelimitedSpan> {
        let bytes = self.text.as_bytes();
        if bytes.get(pos) != Some(&b'`') || (pos > 0 && bytes[pos - 1] == b'`') {
            return None;
        }
        if run_len(bytes, pos, b'`') != 1 {
            return None;
        }
        let inner_start = pos + 1;
        let limit = self.paragraph_end(inner_start);
        let closer = first_at_or_after(&self.ticks, inner_start)
            .filter(|&candidate| candidate < limit)?;
        Some(DelimitedSpan {
            start: pos,
            inner: inner_start..closer,
            end: closer + 1,
            level: 1,
        })
    }

    /// Whether the text holds any emphasis or inline code span.
    pub(super) fn has_inline_markup(&self) -> bool {
        let bytes = self.text.as_bytes();
        let mut i = 0;
        while let Some(offset) = memchr2(b'*', b'`', &bytes[i..]) {
            let pos = i + offset;
            let found = match bytes[pos] {
                b'*' => self.emphasis_at(pos).is_some(),
                _ => self.inline_code_at(pos).is_some(),
            };
            if found {
                return true;
            }
            i = pos + run_len(bytes, pos, bytes[pos]);
        }
        false
    }

    /// Start offsets of every emphasis span of exactly `level`, left to
    /// right. Spans of other levels are stepped over whole, so a bold-italic
    /// run nested inside bold text is not reported.
    pub(super) fn emphasis_starts(&self, level: usize) -> Vec<usize> {
        let bytes = self.text.as_bytes();
        let mut starts = Vec::new();
        let mut i = 0;
        while let Some(offset) = memchr(b'*', &bytes[i..]) {
            let pos = i + offset;
            match self.emphasis_at(pos) {
                Some(span) => {
                    if span.level == level {
                        starts.push(pos);
                    }
                    i = span.end;
                }
                None => i = pos + run_len(bytes, pos, b'*'),
            }
            if i >= bytes.len() {
                break;
            }
        }
        starts
    }

    /// Offsets of bold spans that begin a line (only spaces or tabs before
    /// them on that line). These are the top-level section headings.
    pub(super) fn line_heading_starts(&self) -> Vec<usize> {
        let bytes = self.text.as_bytes();
        let line_starts = std::iter::once(0).chain(memchr_iter(b'\n', bytes).map(|i| i + 1));
        line_starts
            .filter_map(|line_start| {
                let indent = bytes[line_start..]
                    .iter()
                    .take_while(|&&b| b == b' ' || b == b'\t')
                    .count();
                let pos = line_start + indent;
                self.emphasis_at(pos)
                    .filter(|span| span.level == 2)
                    .map(|_| pos)
            })
            .collect()
    }
}

fn first_at_or_after(sorted: &[usize], from: usize) -> Option<usize> {
    sorted.get(sorted.partition_point(|&p| p < from)).copied()
}

pub(super) fn emphasis_at(text: &str, pos: usize) -> Option<DelimitedSpan> {
    DelimiterIndex::new(text).emphasis_at(pos)
}

pub(super) fn emphasis_starts(text: &str, level: usize) -> Vec<usize> {
    DelimiterIndex::new(text).emphasis_starts(level)
}

pub(super) fn line_heading_starts(text: &str) -> Vec<usize> {
    DelimiterIndex::new(text).line_heading_starts()
}

/// Heading text with its delimiters already removed: trimmed, with a
/// trailing colon dropped.
pub(super) fn clean_heading(inner: &str) -> String {
    let trimmed = inner.trim();
    trimmed
        .strip_suffix(':')
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}

/// Drop the colon that may follow a heading's closing delimiter.
pub(super) fn strip_heading_colon(rest: &str) -> &str {
    rest.strip_prefix(':').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_run_lengths() {
        let span = emphasis_at("***both***", 0).expect("bold italic");
        assert_eq!(span.level, 3);
        assert_eq!(span.inner, 3..7);

        let span = emphasis_at("**bold** rest", 0).expect("bold");
        assert_eq!(span.level, 2);
        assert_eq!(span.end, 8);

        let span = emphasis_at("*it*", 0).expect("italic");
        assert_eq!(span.level, 1);
    }

    #[test]
    fn four_asterisks_are_literal() {
        assert!(emphasis_at("****text****", 0).is_none());
        assert!(!DelimiterIndex::new("****text****").has_inline_markup());
    }

    #[test]
    fn opener_needs_non_space_and_closer_needs_non_space() {
        assert!(emphasis_at("* not a list*", 0).is_none());
        assert!(emphasis_at("*open *", 0).is_none());
        assert!(!DelimiterIndex::new("2 * 3 * 4").has_inline_markup());
    }

    #[test]
    fn spans_do_not_cross_blank_lines() {
        assert!(emphasis_at("*start\n\nend*", 0).is_none());
        assert!(emphasis_at("*start\nend*", 0).is_some());
        assert!(DelimiterIndex::new("`a\n  \nb`").inline_code_at(0).is_none());
    }

    #[test]
    fn inline_code_needs_content() {
        assert!(DelimiterIndex::new("``").inline_code_at(0).is_none());
        let span = DelimiterIndex::new("`x` y").inline_code_at(0).expect("code");
        assert_eq!(span.inner, 1..2);
    }

    #[test]
    fn line_headings_ignore_mid_line_bold() {
        let text = "**Intro** text with **bold**\n  **Next:** more";
        assert_eq!(line_heading_starts(text), vec![0, 31]);
    }

    #[test]
    fn emphasis_starts_skip_nested_levels() {
        let text = "a ***one*** b **x ***y*** z** ***two***";
        let starts = emphasis_starts(text, 3);
        assert_eq!(starts.len(), 2);
        assert_eq!(&text[starts[0]..starts[0] + 3], "***");
        assert!(text[starts[1]..].starts_with("***two"));
    }

    #[test]
    fn paragraph_end_finds_the_next_blank_line() {
        let text = "one\ntwo\n\nthree\n  \nfour";
        let index = DelimiterIndex::new(text);
        assert_eq!(index.paragraph_end(0), 7);
        assert_eq!(index.paragraph_end(8), 14);
        assert_eq!(index.paragraph_end(15), text.len());
    }

    #[test]
    fn closers_are_found_past_many_unmatched_openers() {
        let text = format!("{}*end*", "*a ".repeat(1_000));
        let index = DelimiterIndex::new(&text);
        let span = index.emphasis_at(0).expect("span to the final closer");
        assert_eq!(span.end, text.len());
        assert!(index.has_inline_markup());
        assert!(!DelimiterIndex::new(&"*a ".repeat(1_000)).has_inline_markup());
    }

    #[test]
    fn clean_heading_drops_trailing_colon() {
        assert_eq!(clean_heading(" Overview: "), "Overview");
        assert_eq!(clean_heading("Plain"), "Plain");
        assert_eq!(strip_heading_colon(": body"), " body");
    }
}
