use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::core::code_actions::{Clipboard, CodeActionRuntime};
use crate::core::config::ExecutionConfig;
use crate::core::conversation::Conversation;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod lifecycle;


pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use lifecycle::SubmitError;

/// How long a transient status line (such as a copy confirmation) stays
/// visible.
pub const STATUS_TTL: Duration = Duration::from_secs(2);

/// Outbound request bookkeeping. `busy` is true from submission until the
/// matching response is applied or the conversation is cleared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestState {
    pub busy: bool,
    pub last_error: Option<String>,
}

pub struct SessionContext {
    pub session_id: String,
    /// Bumped by every submission and every clear; completions carrying an
    /// older value are dropped.
    pub generation: u64,
    /// Bumped by every clear; code run results from an older epoch are
    /// dropped.
    pub epoch: u64,
    /// Parent token of all code runs started since the last clear.
    pub exec_cancel_token: CancellationToken,
    /// Token of the request in flight, if any.
    pub request_cancel_token: CancellationToken,
}

#[derive(Debug, Clone)]
pub struct Status {
    pub message: String,
    pub set_at: Instant,
}

pub struct App {
    pub conversation: Conversation,
    pub request: RequestState,
    pub session: SessionContext,
    pub code_actions: CodeActionRuntime,
    pub status: Option<Status>,
    pub logging: LoggingState,
    pub transcript: Option<PathBuf>,
}

/// Configuration parameters for initializing an App
pub struct AppInitConfig {
    pub session_id: String,
    pub clipboard: Box<dyn Clipboard>,
    pub execution: ExecutionConfig,
    pub log_file: Option<String>,
    pub transcript: Option<PathBuf>,
}

impl App {
    pub fn new(init: AppInitConfig) -> Result<App, Box<dyn std::error::Error>> {
        Ok(App {
            conversation: Conversation::new(),
            request: RequestState::default(),
            session: SessionContext {
                session_id: init.session_id,
                generation: 0,
                epoch: 0,
                exec_cancel_token: CancellationToken::new(),
                request_cancel_token: CancellationToken::new(),
            },
            code_actions: CodeActionRuntime::new(init.clipboard, init.execution),
            status: None,
            logging: LoggingState::new(init.log_file)?,
            transcript: init.transcript,
        })
    }

    pub fn is_current_generation(&self, generation: u64) -> bool {
        self.session.generation == generation
    }

    pub fn set_status<S: Into<String>>(&mut self, s: S) {
        self.status = Some(Status {
            message: s.into(),
            set_at: Instant::now(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// The status line if it has not expired yet.
    pub fn visible_status(&self) -> Option<&str> {
        self.visible_status_at(Instant::now())
    }

    pub(crate) fn visible_status_at(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|status| now.saturating_duration_since(status.set_at) < STATUS_TTL)
            .map(|status| status.message.as_str())
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        let turn = self.conversation.push_system(content);
        if let Err(err) = self.logging.log_turn(turn) {
            tracing::warn!(error = %err, "failed to log system turn");
        }
    }
}
