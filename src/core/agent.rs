use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{GenerateRequest, GenerateResponse, HealthStatus};
use crate::utils::url::construct_api_url;

const NO_RESPONSE: &str = "No response received from agent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Non-2xx reply.
    Status { status: u16, message: String },
    /// 2xx reply without a usable answer.
    Backend(String),
    Transport(String),
    Decode(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Status { message, .. } => f.write_str(message),
            AgentError::Backend(message) => f.write_str(message),
            AgentError::Transport(message) => write!(f, "request failed: {message}"),
            AgentError::Decode(message) => write!(f, "invalid response from agent: {message}"),
        }
    }
}

impl std::error::Error for AgentError {}

/// The hosted service that answers questions.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AgentError>;
    async fn health(&self) -> Result<HealthStatus, AgentError>;
}

pub struct HttpAgentBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AgentError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AgentError> {
        let url = construct_api_url(&self.base_url, "generate");
        debug!(%url, history = request.history.len(), "sending question to agent");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|err| AgentError::Decode(err.to_string()))?;
        answer_from(parsed)
    }

    async fn health(&self) -> Result<HealthStatus, AgentError> {
        let url = construct_api_url(&self.base_url, "health");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|err| AgentError::Decode(err.to_string()))
    }
}

fn status_error(status: u16, body: &str) -> AgentError {
    let message = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .map(|error| error.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|error| !error.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {status}"));
    AgentError::Status { status, message }
}

/// A 2xx body only counts as an answer when it says so and the answer is
/// non-blank.
fn answer_from(parsed: GenerateResponse) -> Result<String, AgentError> {
    match parsed.response {
        Some(answer) if parsed.success && !answer.trim().is_empty() => Ok(answer),
        _ => Err(AgentError::Backend(
            parsed
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| NO_RESPONSE.to_string()),
        )),
    }
}

#[derive(Debug)]
pub enum AgentEvent {
    Completed {
        generation: u64,
        result: Result<String, AgentError>,
    },
}

#[derive(Debug)]
pub struct AgentRequest {
    pub request: GenerateRequest,
    /// Session generation captured at submission.
    pub generation: u64,
    /// Cancelled when the conversation is cleared; the request then ends
    /// without reporting.
    pub cancel: CancellationToken,
}

/// Runs agent calls off the input loop and reports each outcome, tagged
/// with its generation, on a channel.
#[derive(Clone)]
pub struct AgentService {
    backend: Arc<dyn AgentBackend>,
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl AgentService {
    pub fn new(backend: Arc<dyn AgentBackend>) -> (Self, mpsc::UnboundedReceiver<AgentEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn spawn_request(&self, params: AgentRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let AgentRequest {
                request,
                generation,
                cancel,
            } = params;
            let result = tokio::select! {
                result = backend.generate(&request) => result,
                _ = cancel.cancelled() => {
                    debug!(generation, "agent request cancelled");
                    return;
                }
            };
            if let Err(err) = &result {
                warn!(generation, error = %err, "agent request failed");
            }
            let _ = tx.send(AgentEvent::Completed { generation, result });
        });
    }
}
