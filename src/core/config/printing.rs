use crate::core::config::data::{path_display, Config};
use crate::core::config::defaults::{
    DEFAULT_BACKEND_URL, DEFAULT_EXEC_TIMEOUT_SECS, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_NODE,
    DEFAULT_PYTHON, DEFAULT_REQUEST_TIMEOUT_SECS,
};

impl Config {
    pub fn print_all(&self) {
        for line in self.summary_lines() {
            println!("{line}");
        }
    }

    pub(crate) fn summary_lines(&self) -> Vec<String> {
        let exec = &self.execution;
        let mut lines = vec!["Current configuration:".to_string()];
        lines.push(match &self.backend_url {
            Some(url) => format!("  backend-url: {url}"),
            None => format!("  backend-url: (unset, default: {DEFAULT_BACKEND_URL})"),
        });
        lines.push(match &self.session_id {
            Some(id) => format!("  session-id: {id}"),
            None => "  session-id: (unset, random per run)".to_string(),
        });
        lines.push(or_default(
            "request-timeout",
            self.request_timeout_secs,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));
        lines.push(match &self.transcript {
            Some(path) => format!("  transcript: {}", path_display(path)),
            None => "  transcript: (unset)".to_string(),
        });
        lines.push(or_default(
            "exec-timeout",
            exec.timeout_secs,
            DEFAULT_EXEC_TIMEOUT_SECS,
        ));
        lines.push(or_default(
            "max-output-bytes",
            exec.max_output_bytes,
            DEFAULT_MAX_OUTPUT_BYTES,
        ));
        lines.push(or_default("python", exec.python.as_deref(), DEFAULT_PYTHON));
        lines.push(or_default("node", exec.node.as_deref(), DEFAULT_NODE));
        lines.push(match &exec.preview_dir {
            Some(dir) => format!("  preview-dir: {}", path_display(dir)),
            None => "  preview-dir: (unset, system temp dir)".to_string(),
        });
        lines
    }
}

fn or_default<T: std::fmt::Display>(key: &str, value: Option<T>, default: T) -> String {
    match value {
        Some(value) => format!("  {key}: {value}"),
        None => format!("  {key}: (unset, default: {default})"),
    }
}
