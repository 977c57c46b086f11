use crate::core::config::data::{Config, ExecutionConfig};
use crate::utils::random::random_urlsafe;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const BACKEND_URL_ENV: &str = "LUMINA_BACKEND_URL";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 16 * 1024;
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_NODE: &str = "node";

impl Config {
    /// Backend URL by precedence: explicit override, then the environment,
    /// then the file, then the built-in default.
    pub fn resolve_backend_url(&self, cli_override: Option<&str>) -> String {
        self.resolve_backend_url_with(cli_override, std::env::var(BACKEND_URL_ENV).ok())
    }

    pub(crate) fn resolve_backend_url_with(
        &self,
        cli_override: Option<&str>,
        env_value: Option<String>,
    ) -> String {
        cli_override
            .map(str::to_string)
            .or(env_value.filter(|value| !value.trim().is_empty()))
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// Session id from the override or the file, else a fresh random one.
    pub fn resolve_session_id(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| self.session_id.clone())
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("session-{}", random_urlsafe(12)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_EXEC_TIMEOUT_SECS))
    }

    pub fn output_cap(&self) -> usize {
        self.max_output_bytes.unwrap_or(DEFAULT_MAX_OUTPUT_BYTES)
    }

    pub fn python_program(&self) -> &str {
        self.python.as_deref().unwrap_or(DEFAULT_PYTHON)
    }

    pub fn node_program(&self) -> &str {
        self.node.as_deref().unwrap_or(DEFAULT_NODE)
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.preview_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
