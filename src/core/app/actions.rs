use tokio::sync::mpsc;

use super::App;
use crate::core::agent::{AgentError, AgentRequest};
use crate::core::sandbox::{ExecutionError, ExecutionJob, ExecutionOutcome};
use crate::ui::markdown::CodeBlockId;

pub enum AppAction {
    SubmitMessage {
        message: String,
    },
    AgentCompleted {
        generation: u64,
        result: Result<String, AgentError>,
    },
    ExecutionFinished {
        epoch: u64,
        block_id: CodeBlockId,
        language: String,
        result: Result<ExecutionOutcome, ExecutionError>,
    },
    ClearConversation,
    DismissError,
    CopyCode {
        id: String,
    },
    RunCode {
        id: String,
    },
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Side effects requested by a state change, carried out by the loop that
/// owns the services.
pub enum AppCommand {
    SendQuestion(AgentRequest),
    RunCode(ExecutionJob),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => match app.submit(&message) {
            Ok(request) => Some(AppCommand::SendQuestion(request)),
            Err(err) => {
                app.set_status(err.to_string());
                None
            }
        },
        AppAction::AgentCompleted { generation, result } => {
            app.complete(generation, result);
            None
        }
        AppAction::ExecutionFinished {
            epoch,
            block_id,
            language,
            result,
        } => {
            app.finish_execution(epoch, &block_id, &language, result);
            None
        }
        AppAction::ClearConversation => {
            app.clear_conversation();
            None
        }
        AppAction::DismissError => {
            app.dismiss_error();
            None
        }
        AppAction::CopyCode { id } => {
            app.copy_code(&id);
            None
        }
        AppAction::RunCode { id } => app.run_code(&id).map(AppCommand::RunCode),
    }
}
