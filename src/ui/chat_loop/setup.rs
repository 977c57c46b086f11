use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::core::agent::{AgentBackend, AgentEvent, AgentService, HttpAgentBackend};
use crate::core::app::{App, AppInitConfig};
use crate::core::code_actions::{Clipboard, SystemClipboard};
use crate::core::config::Config;
use crate::core::sandbox::{ExecutionEvent, ExecutionService, SandboxLimits};

/// Command-line overrides for an interactive session.
#[derive(Debug, Default, Clone)]
pub struct ChatOptions {
    pub backend_url: Option<String>,
    pub session_id: Option<String>,
    pub log: Option<String>,
    pub transcript: Option<PathBuf>,
}

/// Application state plus the services that carry out its commands.
pub struct ChatSession {
    pub app: App,
    pub agent: AgentService,
    pub agent_rx: mpsc::UnboundedReceiver<AgentEvent>,
    pub execution: ExecutionService,
    pub execution_rx: mpsc::UnboundedReceiver<ExecutionEvent>,
}

pub fn bootstrap_session(config: &Config, options: ChatOptions) -> Result<ChatSession, Box<dyn Error>> {
    let backend_url = config.resolve_backend_url(options.backend_url.as_deref());
    debug!(%backend_url, "connecting to agent backend");
    let backend = HttpAgentBackend::new(backend_url, config.request_timeout())?;
    bootstrap_with(config, options, Arc::new(backend), Box::new(SystemClipboard))
}

/// Assemble a session around an arbitrary backend and clipboard.
pub fn bootstrap_with(
    config: &Config,
    options: ChatOptions,
    backend: Arc<dyn AgentBackend>,
    clipboard: Box<dyn Clipboard>,
) -> Result<ChatSession, Box<dyn Error>> {
    let app = App::new(AppInitConfig {
        session_id: config.resolve_session_id(options.session_id.as_deref()),
        clipboard,
        execution: config.execution.clone(),
        log_file: options.log,
        transcript: options.transcript.or_else(|| config.transcript.clone()),
    })?;
    let (agent, agent_rx) = AgentService::new(backend);
    let (execution, execution_rx) = ExecutionService::new(SandboxLimits::from(&config.execution));

    Ok(ChatSession {
        app,
        agent,
        agent_rx,
        execution,
        execution_rx,
    })
}
