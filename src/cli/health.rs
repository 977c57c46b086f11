//! `health` command: probe the agent backend.

use std::error::Error;

use crate::api::HealthStatus;
use crate::core::agent::{AgentBackend, HttpAgentBackend};
use crate::core::config::Config;

pub async fn run_health(backend_url: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let base_url = config.resolve_backend_url(backend_url.as_deref());
    let backend = HttpAgentBackend::new(base_url.clone(), config.request_timeout())?;

    match backend.health().await {
        Ok(status) => {
            for line in health_lines(&base_url, &status) {
                println!("{line}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {base_url} is not healthy: {err}");
            std::process::exit(1);
        }
    }
}

pub fn health_lines(base_url: &str, status: &HealthStatus) -> Vec<String> {
    let mut lines = vec![format!("Backend: {base_url}"), format!("Status: {}", status.status)];
    if let Some(environment) = &status.environment {
        lines.push(format!("Environment: {environment}"));
    }
    if let Some(timestamp) = &status.timestamp {
        lines.push(format!("Reported at: {timestamp}"));
    }
    lines.push(format!(
        "API key configured: {}",
        if status.has_api_key { "yes" } else { "no" }
    ));
    lines
}
