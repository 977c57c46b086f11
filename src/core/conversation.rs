use crate::api::HistoryMessage;
use crate::core::message::{Role, Turn};
use crate::ui::markdown::html::RenderedHtml;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// An assistant turn must answer a user turn.
    AssistantWithoutUser,
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::AssistantWithoutUser => {
                write!(f, "assistant turn has no preceding user turn")
            }
        }
    }
}

impl std::error::Error for ConversationError {}

/// Ordered, append-only list of turns for one session. Turns are never
/// edited after they are appended; the only way to drop them is [`clear`].
///
/// [`clear`]: Conversation::clear
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::user(content))
    }

    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        rendered_html: RenderedHtml,
    ) -> Result<&Turn, ConversationError> {
        if !self.awaiting_answer() {
            return Err(ConversationError::AssistantWithoutUser);
        }
        Ok(self.push(Turn::assistant(content, rendered_html)))
    }

    pub fn push_system(&mut self, content: impl Into<String>) -> &Turn {
        self.push(Turn::system(content))
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// User and assistant turns in order, as sent with the next question.
    /// System notes stay local.
    pub fn history(&self) -> Vec<HistoryMessage> {
        self.turns
            .iter()
            .filter_map(|turn| {
                turn.role.to_api_role().map(|role| HistoryMessage {
                    role: role.to_string(),
                    content: turn.content.clone(),
                })
            })
            .collect()
    }

    /// True when the most recent non-system turn is a user turn.
    fn awaiting_answer(&self) -> bool {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role != Role::System)
            .is_some_and(Turn::is_user)
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        let idx = self.turns.len() - 1;
        &self.turns[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::markdown::html::{HtmlWriter, Tag};

    fn paragraph(text: &str) -> RenderedHtml {
        let mut w = HtmlWriter::new();
        w.element(Tag::P, &[], text);
        w.finish_rendered()
    }

    #[test]
    fn history_skips_system_notes() {
        let mut conversation = Conversation::new();
        conversation.push_user("What is JavaScript?");
        conversation.push_system("Copied code-abc");
        conversation
            .push_assistant("A language.", paragraph("A language."))
            .expect("answer");

        let history = conversation.history();
        assert_eq!(
            history,
            vec![
                HistoryMessage {
                    role: "user".into(),
                    content: "What is JavaScript?".into()
                },
                HistoryMessage {
                    role: "assistant".into(),
                    content: "A language.".into()
                },
            ]
        );
    }

    #[test]
    fn assistant_turn_requires_pending_user_turn() {
        let mut conversation = Conversation::new();
        assert_eq!(
            conversation.push_assistant("orphan", RenderedHtml::default()).err(),
            Some(ConversationError::AssistantWithoutUser)
        );

        conversation.push_user("q");
        conversation.push_system("note");
        assert!(conversation.push_assistant("a", RenderedHtml::default()).is_ok());
        assert!(conversation.push_assistant("again", RenderedHtml::default()).is_err());
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut conversation = Conversation::new();
        conversation.push_user("q");
        conversation.clear();
        assert!(conversation.is_empty());
        assert!(conversation.history().is_empty());
    }

    #[test]
    fn only_assistant_turns_carry_markup() {
        let mut conversation = Conversation::new();
        conversation.push_user("q");
        conversation
            .push_assistant("a", paragraph("a"))
            .expect("answer");
        let turns = conversation.turns();
        assert!(turns[0].rendered_html.is_none());
        assert_eq!(turns[1].rendered_html.as_deref(), Some("<p>a</p>"));
    }
}
