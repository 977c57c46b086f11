use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{App, RequestState};
use crate::api::GenerateRequest;
use crate::core::agent::{AgentError, AgentRequest};
use crate::core::code_actions::RunPlan;
use crate::core::sandbox::{describe_outcome, ExecutionError, ExecutionJob, ExecutionOutcome};
use crate::ui::markdown::{render, CodeBlockId};

pub const ERROR_PREFIX: &str = "Error communicating with the agent:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    Busy,
    Empty,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Busy => write!(f, "Still waiting for the previous answer"),
            SubmitError::Empty => write!(f, "Nothing to send"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl App {
    /// Accept a question: append the user turn, mark the session busy and
    /// return the outbound request. Rejected while a request is in flight.
    pub fn submit(&mut self, input: &str) -> Result<AgentRequest, SubmitError> {
        let question = input.trim();
        if question.is_empty() {
            return Err(SubmitError::Empty);
        }
        if self.request.busy {
            return Err(SubmitError::Busy);
        }

        self.clear_status();
        let history = self.conversation.history();
        let turn = self.conversation.push_user(question);
        if let Err(err) = self.logging.log_turn(turn) {
            warn!(error = %err, "failed to log user turn");
        }

        self.request = RequestState {
            busy: true,
            last_error: None,
        };
        let generation = self.start_new_request();
        self.session.request_cancel_token = CancellationToken::new();
        debug!(generation, history = history.len(), "question submitted");

        Ok(AgentRequest {
            request: GenerateRequest {
                question: question.to_string(),
                session_id: self.session.session_id.clone(),
                history,
            },
            generation,
            cancel: self.session.request_cancel_token.clone(),
        })
    }

    fn start_new_request(&mut self) -> u64 {
        self.session.generation += 1;
        self.session.generation
    }

    /// Apply the outcome of the request tagged `generation`. Returns false
    /// when the outcome is stale and was dropped.
    pub fn complete(&mut self, generation: u64, result: Result<String, AgentError>) -> bool {
        if !self.is_current_generation(generation) || !self.request.busy {
            debug!(
                generation,
                current = self.session.generation,
                "discarding stale agent response"
            );
            return false;
        }
        self.request.busy = false;

        match result {
            Ok(answer) => {
                let html = render(&answer, &mut self.code_actions);
                match self.conversation.push_assistant(answer, html) {
                    Ok(turn) => {
                        if let Err(err) = self.logging.log_turn(turn) {
                            warn!(error = %err, "failed to log assistant turn");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "dropping assistant turn");
                        self.request.last_error = Some(format!("{ERROR_PREFIX} {err}"));
                    }
                }
            }
            Err(err) => {
                self.request.last_error = Some(format!("{ERROR_PREFIX} {err}"));
            }
        }
        true
    }

    /// Empty the conversation and reset request state, even mid-flight.
    /// The request in flight and running code are cancelled; anything that
    /// still reports back is dropped by the generation and epoch bumps.
    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.request = RequestState::default();
        self.code_actions.clear();
        self.session.request_cancel_token.cancel();
        self.session.exec_cancel_token.cancel();
        self.session.exec_cancel_token = CancellationToken::new();
        self.session.epoch += 1;
        self.start_new_request();
        self.clear_status();
        if let Err(err) = self.logging.log_message("## Conversation cleared") {
            warn!(error = %err, "failed to log clear");
        }
    }

    pub fn dismiss_error(&mut self) {
        self.request.last_error = None;
    }

    pub fn copy_code(&mut self, id: &str) {
        match self.code_actions.copy(id) {
            Ok(block_id) => self.set_status(format!("Copied {block_id}")),
            Err(err) => self.set_status(err.to_string()),
        }
    }

    /// Run-by-id. Refusals become a system turn right away; allowed runs
    /// come back as a job for the sandbox.
    pub fn run_code(&mut self, id: &str) -> Option<ExecutionJob> {
        match self.code_actions.plan_run(id) {
            RunPlan::Refuse(note) => {
                self.add_system_message(note);
                None
            }
            RunPlan::Execute {
                block_id,
                language,
                source,
                runner,
            } => {
                self.set_status(format!("Running {block_id}"));
                Some(ExecutionJob {
                    block_id,
                    language,
                    source,
                    runner,
                    epoch: self.session.epoch,
                    cancel: self.session.exec_cancel_token.child_token(),
                })
            }
        }
    }

    pub fn finish_execution(
        &mut self,
        epoch: u64,
        block_id: &CodeBlockId,
        language: &str,
        result: Result<ExecutionOutcome, ExecutionError>,
    ) -> bool {
        if epoch != self.session.epoch {
            debug!(%block_id, "discarding result of a run from a cleared conversation");
            return false;
        }
        let note = describe_outcome(block_id, language, &result, self.code_actions.output_cap());
        self.add_system_message(note);
        true
    }
}
