//! Structured HTML output.
//!
//! Every piece of markup the renderer produces goes through [`HtmlWriter`].
//! Tags and attributes are closed enums, so third-party text can only ever
//! land in text or attribute-value position, and both are escaped.

/// Elements the renderer is allowed to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    Section,
    P,
    Br,
    Strong,
    Em,
    Code,
    Pre,
    Span,
    Button,
    H3,
    H4,
    Html,
    Head,
    Body,
    Meta,
    Title,
    Style,
    Script,
    Main,
    Header,
    Article,
    Time,
    H1,
}

impl Tag {
    fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Section => "section",
            Tag::P => "p",
            Tag::Br => "br",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::Code => "code",
            Tag::Pre => "pre",
            Tag::Span => "span",
            Tag::Button => "button",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::Html => "html",
            Tag::Head => "head",
            Tag::Body => "body",
            Tag::Meta => "meta",
            Tag::Title => "title",
            Tag::Style => "style",
            Tag::Script => "script",
            Tag::Main => "main",
            Tag::Header => "header",
            Tag::Article => "article",
            Tag::Time => "time",
            Tag::H1 => "h1",
        }
    }
}

/// Attributes the renderer is allowed to emit. Event-handler attributes are
/// deliberately absent; interactive controls are wired up by id instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attr {
    Class,
    Id,
    Type,
    Title,
    DataAction,
    DataCodeId,
    DataLanguage,
    Lang,
    Charset,
    Name,
    Content,
    DateTime,
}

impl Attr {
    fn name(self) -> &'static str {
        match self {
            Attr::Class => "class",
            Attr::Id => "id",
            Attr::Type => "type",
            Attr::Title => "title",
            Attr::DataAction => "data-action",
            Attr::DataCodeId => "data-code-id",
            Attr::DataLanguage => "data-language",
            Attr::Lang => "lang",
            Attr::Charset => "charset",
            Attr::Name => "name",
            Attr::Content => "content",
            Attr::DateTime => "datetime",
        }
    }
}

/// Escape text for use in HTML text or a double-quoted attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_escaped(&mut out, input);
    out
}

fn push_escaped(out: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, tag: Tag, attrs: &[(Attr, &str)]) -> &mut Self {
        self.out.push('<');
        self.out.push_str(tag.name());
        for (attr, value) in attrs {
            self.out.push(' ');
            self.out.push_str(attr.name());
            self.out.push_str("=\"");
            push_escaped(&mut self.out, value);
            self.out.push('"');
        }
        self.out.push('>');
        self
    }

    pub fn close(&mut self, tag: Tag) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(tag.name());
        self.out.push('>');
        self
    }

    /// Self-contained element such as `<br>`.
    pub fn void(&mut self, tag: Tag) -> &mut Self {
        self.open(tag, &[])
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        push_escaped(&mut self.out, text);
        self
    }

    /// `open`, escaped `text`, `close` in one go.
    pub fn element(&mut self, tag: Tag, attrs: &[(Attr, &str)], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    /// Splice in a fragment previously produced by [`HtmlWriter::finish`],
    /// such as the stored rendering of an assistant turn.
    pub fn rendered(&mut self, fragment: &RenderedHtml) -> &mut Self {
        self.out.push_str(&fragment.0);
        self
    }

    /// Literal markup known at compile time (doctype, page script, styles).
    pub fn static_markup(&mut self, markup: &'static str) -> &mut Self {
        self.out.push_str(markup);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn finish_rendered(self) -> RenderedHtml {
        RenderedHtml(self.out)
    }
}

/// Markup that came out of an [`HtmlWriter`]. Only the writer can build one,
/// so holding a `RenderedHtml` means the text was escaped on the way in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedHtml(String);

impl RenderedHtml {
    /// Wrap the output of a finished writer pass.
    pub(super) fn from_writer(markup: String) -> Self {
        Self(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for RenderedHtml {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RenderedHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
