//! Standalone HTML page mirroring the conversation.
//!
//! The page is rebuilt from scratch after every change and swapped into
//! place atomically, so a browser refresh never sees a half-written file.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants::PRODUCT_NAME;
use crate::core::conversation::Conversation;
use crate::core::message::{Role, Turn};
use crate::ui::markdown::html::{Attr, HtmlWriter, Tag};

const DOCTYPE: &str = "<!DOCTYPE html>";

const PAGE_STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
.turn{margin:1rem 0;padding:.75rem 1rem;border-radius:.5rem}\
.turn-user{background:#eef4ff}\
.turn-assistant{background:#f7f7f7}\
.turn-system{background:#fff8e5;font-size:.9em}\
.turn-meta{display:flex;gap:.5rem;font-size:.8em;color:#666}\
.turn-text{white-space:pre-wrap;margin:.25rem 0 0}\
.plain-text{white-space:pre-wrap}\
.code-block{border:1px solid #ddd;border-radius:.4rem;margin:.5rem 0}\
.code-header{display:flex;gap:.5rem;align-items:center;padding:.25rem .5rem;background:#eee}\
.code-language{flex:1;font-size:.8em;color:#555}\
.code-body{margin:0;padding:.5rem;overflow-x:auto}\
.empty{color:#666}";

// Copy buttons look their block up by element id. Run buttons copy the
// terminal command, since code only runs from the chat loop.
const PAGE_SCRIPT: &str = "document.addEventListener('click',function(e){\
var b=e.target.closest('button[data-action]');if(!b)return;\
var id=b.getAttribute('data-code-id');var text;\
if(b.getAttribute('data-action')==='copy'){var el=document.getElementById(id);if(!el)return;text=el.textContent;}\
else{text='/run '+id;}\
navigator.clipboard.writeText(text).then(function(){var old=b.textContent;b.textContent='Copied';\
setTimeout(function(){b.textContent=old;},2000);});});";

#[derive(Debug)]
pub struct TranscriptError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to write transcript {}: {}",
            self.path.display(),
            self.message
        )
    }
}

impl std::error::Error for TranscriptError {}

/// Build the full page for `conversation`.
pub fn render_page(conversation: &Conversation) -> String {
    let mut w = HtmlWriter::new();
    let title = format!("{PRODUCT_NAME} transcript");

    w.static_markup(DOCTYPE);
    w.open(Tag::Html, &[(Attr::Lang, "en")]);
    w.open(Tag::Head, &[]);
    w.open(Tag::Meta, &[(Attr::Charset, "utf-8")]);
    w.open(
        Tag::Meta,
        &[
            (Attr::Name, "viewport"),
            (Attr::Content, "width=device-width, initial-scale=1"),
        ],
    );
    w.element(Tag::Title, &[], &title);
    w.open(Tag::Style, &[]).static_markup(PAGE_STYLE).close(Tag::Style);
    w.close(Tag::Head);

    w.open(Tag::Body, &[]);
    w.open(Tag::Header, &[]).element(Tag::H1, &[], &title).close(Tag::Header);
    w.open(Tag::Main, &[(Attr::Class, "conversation")]);
    if conversation.is_empty() {
        w.element(Tag::P, &[(Attr::Class, "empty")], "No messages yet.");
    }
    for turn in conversation.turns() {
        write_turn(&mut w, turn);
    }
    w.close(Tag::Main);
    w.open(Tag::Script, &[]).static_markup(PAGE_SCRIPT).close(Tag::Script);
    w.close(Tag::Body);
    w.close(Tag::Html);

    w.finish()
}

fn write_turn(w: &mut HtmlWriter, turn: &Turn) {
    let class = format!("turn turn-{}", turn.role.as_str());
    let datetime = turn.timestamp.to_rfc3339();

    w.open(Tag::Article, &[(Attr::Class, class.as_str())]);
    w.open(Tag::Div, &[(Attr::Class, "turn-meta")]);
    w.element(Tag::Span, &[(Attr::Class, "turn-role")], role_label(turn.role));
    w.element(
        Tag::Time,
        &[(Attr::DateTime, datetime.as_str())],
        &turn.display_time(),
    );
    w.close(Tag::Div);

    match (&turn.role, &turn.rendered_html) {
        (Role::Assistant, Some(html)) => {
            w.rendered(html);
        }
        _ => {
            w.element(Tag::P, &[(Attr::Class, "turn-text")], &turn.content);
        }
    }
    w.close(Tag::Article);
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => PRODUCT_NAME,
        Role::System => "Note",
    }
}

/// Render the page and replace `path` with it.
pub fn write_transcript(path: &Path, conversation: &Conversation) -> Result<(), TranscriptError> {
    let write_err = |message: String| TranscriptError {
        path: path.to_path_buf(),
        message,
    };
    let page = render_page(conversation);
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());

    if let Some(dir) = parent {
        std::fs::create_dir_all(dir).map_err(|err| write_err(err.to_string()))?;
    }
    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|err| write_err(err.to_string()))?;

    temp_file
        .write_all(page.as_bytes())
        .and_then(|_| temp_file.as_file_mut().sync_all())
        .map_err(|err| write_err(err.to_string()))?;
    temp_file
        .persist(path)
        .map_err(|err| write_err(err.to_string()))?;

    debug!(path = %path.display(), turns = conversation.len(), "transcript written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::markdown::{render, CodeBlock};
    use tempfile::tempdir;

    fn sample_conversation() -> (Conversation, Vec<CodeBlock>) {
        let mut conversation = Conversation::new();
        let mut blocks = Vec::new();
        conversation.push_user("<script>alert('hi')</script>");
        let html = render("Use **bold** and ```js\nconsole.log(1 < 2)\n```", &mut blocks);
        conversation
            .push_assistant("Use **bold** ...", html)
            .expect("answer");
        conversation.push_system("Ran code & got 1");
        (conversation, blocks)
    }

    #[test]
    fn user_and_system_turns_are_escaped_text() {
        let (conversation, _) = sample_conversation();
        let page = render_page(&conversation);

        assert!(page.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("Ran code &amp; got 1"));
        assert_eq!(page.matches("<script>").count(), 1);
    }

    #[test]
    fn assistant_turns_embed_the_rendered_fragment() {
        let (conversation, blocks) = sample_conversation();
        let page = render_page(&conversation);

        assert!(page.contains("<strong>bold</strong>"));
        let id = blocks[0].id.as_str();
        assert!(page.contains(&format!("<code id=\"{id}\"")));
        assert!(page.contains("console.log(1 &lt; 2)"));
        assert!(page.contains("getElementById(id)"));
    }

    #[test]
    fn plain_answers_keep_their_line_breaks() {
        let mut conversation = Conversation::new();
        let html = render("first line\nsecond line", &mut Vec::<CodeBlock>::new());
        conversation
            .push_assistant("first line\nsecond line", html)
            .expect("answer");
        let page = render_page(&conversation);

        assert!(page.contains("<div class=\"plain-text\">first line\nsecond line</div>"));
        assert!(page.contains(".plain-text{white-space:pre-wrap}"));
    }

    #[test]
    fn every_turn_carries_a_timestamp() {
        let (conversation, _) = sample_conversation();
        let page = render_page(&conversation);

        assert_eq!(page.matches("<time datetime=").count(), 3);
        let first = &conversation.turns()[0];
        assert!(page.contains(&format!(">{}</time>", first.display_time())));
    }

    #[test]
    fn empty_conversation_has_placeholder() {
        let page = render_page(&Conversation::new());
        assert!(page.starts_with("<!DOCTYPE html><html lang=\"en\">"));
        assert!(page.contains("No messages yet."));
    }

    #[test]
    fn write_replaces_previous_page() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("chat.html");
        let (mut conversation, _) = sample_conversation();

        write_transcript(&path, &conversation).expect("write");
        assert!(std::fs::read_to_string(&path)
            .expect("read")
            .contains("Ran code"));

        conversation.clear();
        write_transcript(&path, &conversation).expect("rewrite");
        let page = std::fs::read_to_string(&path).expect("read");
        assert!(page.contains("No messages yet."));
        assert!(!page.contains("Ran code"));
    }
}
