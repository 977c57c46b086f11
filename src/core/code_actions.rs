use std::collections::HashMap;
use std::fmt;

use crate::core::config::ExecutionConfig;
use crate::core::sandbox::{ExecutionError, Runner};
use crate::ui::markdown::{is_executable_language, CodeBlock, CodeBlockId, CodeBlockSink};
use crate::utils::clipboard::copy_to_clipboard;

/// Destination of copy-by-id.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> Result<(), String>;
}

/// The desktop clipboard, through whichever helper command is installed.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), String> {
        copy_to_clipboard(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeActionError {
    UnknownBlock(String),
    Clipboard(String),
}

impl fmt::Display for CodeActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeActionError::UnknownBlock(id) => write!(f, "No code block with id {id}"),
            CodeActionError::Clipboard(message) => write!(f, "Copy failed: {message}"),
        }
    }
}

impl std::error::Error for CodeActionError {}

/// What a run-by-id request turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPlan {
    Execute {
        block_id: CodeBlockId,
        language: String,
        source: String,
        runner: Runner,
    },
    /// Nothing runs; the note is appended as a system turn.
    Refuse(String),
}

/// Copy and run handlers for the code blocks currently on screen, keyed by
/// block id. Owned by the app and filled by the renderer through
/// [`CodeBlockSink`]; clearing the conversation unmounts every block.
pub struct CodeActionRuntime {
    blocks: HashMap<CodeBlockId, CodeBlock>,
    order: Vec<CodeBlockId>,
    clipboard: Box<dyn Clipboard>,
    execution: ExecutionConfig,
}

impl CodeActionRuntime {
    pub fn new(clipboard: Box<dyn Clipboard>, execution: ExecutionConfig) -> Self {
        Self {
            blocks: HashMap::new(),
            order: Vec::new(),
            clipboard,
            execution,
        }
    }

    pub fn get(&self, id: &str) -> Option<&CodeBlock> {
        self.blocks.get(&CodeBlockId::from(id))
    }

    /// Registered blocks, oldest first.
    pub fn blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn output_cap(&self) -> usize {
        self.execution.output_cap()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.order.clear();
    }

    pub fn copy(&mut self, id: &str) -> Result<CodeBlockId, CodeActionError> {
        let block = self
            .blocks
            .get(&CodeBlockId::from(id))
            .ok_or_else(|| CodeActionError::UnknownBlock(id.to_string()))?;
        self.clipboard
            .copy(&block.raw_source)
            .map_err(CodeActionError::Clipboard)?;
        Ok(block.id.clone())
    }

    pub fn plan_run(&self, id: &str) -> RunPlan {
        let Some(block) = self.blocks.get(&CodeBlockId::from(id)) else {
            return RunPlan::Refuse(CodeActionError::UnknownBlock(id.to_string()).to_string());
        };
        let runner = is_executable_language(&block.language)
            .then(|| Runner::for_language(&block.language, &self.execution))
            .flatten();
        match runner {
            Some(runner) => RunPlan::Execute {
                block_id: block.id.clone(),
                language: block.language.clone(),
                source: block.raw_source.clone(),
                runner,
            },
            None => {
                RunPlan::Refuse(ExecutionError::Unsupported(block.language.clone()).to_string())
            }
        }
    }
}

impl CodeBlockSink for CodeActionRuntime {
    fn register(&mut self, block: &CodeBlock) {
        if self
            .blocks
            .insert(block.id.clone(), block.clone())
            .is_none()
        {
            self.order.push(block.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::markdown::render;
    use crate::utils::test_utils::RecordingClipboard;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn copy(&mut self, _text: &str) -> Result<(), String> {
            Err("No clipboard command found".into())
        }
    }

    fn runtime_with(text: &str) -> (CodeActionRuntime, RecordingClipboard) {
        let clipboard = RecordingClipboard::default();
        let mut runtime =
            CodeActionRuntime::new(Box::new(clipboard.clone()), ExecutionConfig::default());
        render(text, &mut runtime);
        (runtime, clipboard)
    }

    #[test]
    fn copy_sends_raw_source() {
        let (mut runtime, clipboard) = runtime_with("```js\nif (a < b) {}\n```");
        let id = runtime.blocks().next().expect("block").id.clone();

        assert_eq!(runtime.copy(id.as_str()), Ok(id));
        assert_eq!(clipboard.copied(), vec!["if (a < b) {}".to_string()]);
    }

    #[test]
    fn copy_reports_unknown_ids_and_clipboard_failures() {
        let (mut runtime, _) = runtime_with("plain");
        assert_eq!(
            runtime.copy("code-missing").unwrap_err().to_string(),
            "No code block with id code-missing"
        );

        let mut broken =
            CodeActionRuntime::new(Box::new(BrokenClipboard), ExecutionConfig::default());
        render("```py\nprint(1)\n```", &mut broken);
        let id = broken.blocks().next().expect("block").id.clone();
        assert!(matches!(
            broken.copy(id.as_str()),
            Err(CodeActionError::Clipboard(_))
        ));
    }

    #[test]
    fn run_refuses_languages_outside_the_allow_list() {
        let (runtime, _) = runtime_with("```ruby\nputs 1\n```");
        let id = runtime.blocks().next().expect("block").id.clone();
        assert_eq!(
            runtime.plan_run(id.as_str()),
            RunPlan::Refuse("Execution is not supported for ruby code blocks.".into())
        );
    }

    #[test]
    fn run_plans_allow_listed_languages() {
        let (runtime, _) = runtime_with("```python\nprint(2)\n```");
        let block = runtime.blocks().next().expect("block");
        match runtime.plan_run(block.id.as_str()) {
            RunPlan::Execute {
                language, source, ..
            } => {
                assert_eq!(language, "python");
                assert_eq!(source, "print(2)");
            }
            other => panic!("expected execution, got {other:?}"),
        }
    }

    #[test]
    fn clear_unmounts_every_block() {
        let (mut runtime, _) = runtime_with("```js\n1\n```\n```css\na{}\n```");
        assert_eq!(runtime.len(), 2);
        let id = runtime.blocks().next().expect("block").id.clone();
        runtime.clear();
        assert!(runtime.is_empty());
        assert!(matches!(runtime.plan_run(id.as_str()), RunPlan::Refuse(_)));
    }

    #[test]
    fn blocks_keep_registration_order() {
        let (runtime, _) = runtime_with("```js\n1\n```\ntext\n```text\n2\n```");
        let languages: Vec<_> = runtime.blocks().map(|b| b.language.as_str()).collect();
        assert_eq!(languages, vec!["js", "text"]);
    }
}
