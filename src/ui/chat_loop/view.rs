//! Line-oriented presentation of the chat state.
//!
//! The view never mutates the app; it remembers how much it has already
//! printed and writes only what changed since the last [`TerminalView::sync`].

use std::io::{self, Write};
use std::time::Instant;

use crate::commands::suggestion_list;
use crate::core::app::App;
use crate::core::constants::PRODUCT_NAME;
use crate::core::message::{Role, Turn};

/// Text as it may reach the terminal: tabs expanded, carriage returns turned
/// into newlines and every other control character (ESC included) dropped.
pub fn terminal_safe(text: &str) -> String {
    text.replace('\t', "    ")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

pub struct TerminalView<W: Write> {
    out: W,
    shown_epoch: u64,
    shown_turns: usize,
    shown_blocks: usize,
    shown_error: Option<String>,
    shown_status_at: Option<Instant>,
    was_busy: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown_epoch: 0,
            shown_turns: 0,
            shown_blocks: 0,
            shown_error: None,
            shown_status_at: None,
            was_busy: false,
        }
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        writeln!(self.out, "Welcome to {PRODUCT_NAME}. Try one of these (/suggest <n>):")?;
        writeln!(self.out, "{}", suggestion_list())?;
        writeln!(self.out, "Type /help for commands.")?;
        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", terminal_safe(text))?;
        self.out.flush()
    }

    /// Print everything that changed in `app` since the previous call.
    pub fn sync(&mut self, app: &App) -> io::Result<()> {
        let turns = app.conversation.turns();
        if app.session.epoch != self.shown_epoch {
            self.shown_epoch = app.session.epoch;
            self.shown_turns = 0;
            self.shown_blocks = 0;
            writeln!(self.out, "Conversation cleared.")?;
            if turns.is_empty() {
                self.welcome()?;
            }
        }

        for turn in turns.iter().skip(self.shown_turns) {
            self.write_turn(turn)?;
            if turn.role == Role::Assistant {
                self.write_new_blocks(app)?;
            }
        }
        self.shown_turns = turns.len();

        if app.request.busy && !self.was_busy {
            writeln!(self.out, "{PRODUCT_NAME} is thinking...")?;
        }
        self.was_busy = app.request.busy;

        if app.request.last_error != self.shown_error {
            if let Some(error) = &app.request.last_error {
                writeln!(self.out, "!! {} (/dismiss to hide)", terminal_safe(error))?;
            }
            self.shown_error = app.request.last_error.clone();
        }

        if let Some(status) = &app.status {
            if self.shown_status_at != Some(status.set_at) {
                self.shown_status_at = Some(status.set_at);
                if let Some(message) = app.visible_status() {
                    writeln!(self.out, "-- {}", terminal_safe(&message))?;
                }
            }
        }

        self.out.flush()
    }

    fn write_turn(&mut self, turn: &Turn) -> io::Result<()> {
        let time = turn.display_time();
        let content = terminal_safe(&turn.content);
        match turn.role {
            Role::User => writeln!(self.out, "[{time}] You: {content}"),
            Role::Assistant => {
                writeln!(self.out, "[{time}] {PRODUCT_NAME}:")?;
                writeln!(self.out, "{content}")
            }
            Role::System => {
                writeln!(self.out, "[{time}] *")?;
                for line in content.lines() {
                    writeln!(self.out, "  {line}")?;
                }
                Ok(())
            }
        }
    }

    fn write_new_blocks(&mut self, app: &App) -> io::Result<()> {
        for block in app.code_actions.blocks().skip(self.shown_blocks) {
            let id = block.id.as_str();
            if block.executable {
                writeln!(
                    self.out,
                    "  [{} block] /copy {id}  /run {id}",
                    block.language
                )?;
            } else {
                writeln!(self.out, "  [{} block] /copy {id}", block.language)?;
            }
        }
        self.shown_blocks = app.code_actions.len();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::agent::AgentError;
    use crate::utils::test_utils::create_test_app;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).expect("utf8")
    }

    #[test]
    fn prints_each_turn_once_with_block_hints() {
        let mut app = create_test_app();
        let mut view = TerminalView::new(Vec::new());

        let request = app.submit("show me").expect("submit");
        view.sync(&app).expect("sync");
        app.complete(
            request.generation,
            Ok("Here:\n```py\nprint(1)\n```\n```text\nnote\n```".into()),
        );
        view.sync(&app).expect("sync");
        view.sync(&app).expect("sync again");

        let ids: Vec<String> = app.code_actions.blocks().map(|b| b.id.to_string()).collect();
        let text = output(view);
        assert_eq!(text.matches("You: show me").count(), 1);
        assert_eq!(text.matches("Lumina AI is thinking...").count(), 1);
        assert!(text.contains(&format!("[py block] /copy {0}  /run {0}", ids[0])));
        assert!(text.contains(&format!("[text block] /copy {}\n", ids[1])));
    }

    #[test]
    fn error_banner_is_printed_once_until_it_changes() {
        let mut app = create_test_app();
        let mut view = TerminalView::new(Vec::new());

        let request = app.submit("q").expect("submit");
        app.complete(request.generation, Err(AgentError::Backend("boom".into())));
        view.sync(&app).expect("sync");
        view.sync(&app).expect("sync");

        let text = output(view);
        assert_eq!(
            text.matches("!! Error communicating with the agent: boom").count(),
            1
        );
    }

    #[test]
    fn clearing_reprints_the_welcome_screen() {
        let mut app = create_test_app();
        let mut view = TerminalView::new(Vec::new());

        app.submit("q").expect("submit");
        view.sync(&app).expect("sync");
        app.clear_conversation();
        view.sync(&app).expect("sync");

        let text = output(view);
        assert!(text.contains("Conversation cleared."));
        assert!(text.contains("1. What is JavaScript?"));
    }

    #[test]
    fn control_sequences_never_reach_the_terminal() {
        let mut app = create_test_app();
        let mut view = TerminalView::new(Vec::new());

        let request = app.submit("title \x1b]0;x\x07please").expect("submit");
        app.complete(
            request.generation,
            Ok("hi \x1b]0;pwned\x07\x1b[2J there\r\nnext\tline".into()),
        );
        app.conversation.push_system("stdout:\n\x1b[31mred\x1b[0m");
        view.sync(&app).expect("sync");
        view.notice("done \x1b[H").expect("notice");

        let text = output(view);
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert!(text.contains("hi ]0;pwned[2J there\nnext    line"));
        assert!(text.contains("  [31mred[0m"));
    }

    #[test]
    fn status_lines_are_shown_once() {
        let mut app = create_test_app();
        let mut view = TerminalView::new(Vec::new());

        app.set_status("Copied code-1");
        view.sync(&app).expect("sync");
        view.sync(&app).expect("sync");

        assert_eq!(output(view).matches("-- Copied code-1").count(), 1);
    }
}
