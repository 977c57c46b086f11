use super::data::{Config, ExecutionConfig};
use super::defaults::{DEFAULT_BACKEND_URL, DEFAULT_MAX_OUTPUT_BYTES};
use super::io::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.resolve_backend_url_with(None, None), DEFAULT_BACKEND_URL);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        backend_url: Some("https://agent.example.com".to_string()),
        request_timeout_secs: Some(30),
        execution: ExecutionConfig {
            timeout_secs: Some(2),
            preview_dir: Some(PathBuf::from("/tmp/previews")),
            ..Default::default()
        },
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);
    assert_eq!(loaded.request_timeout(), Duration::from_secs(30));
    assert_eq!(loaded.execution.timeout(), Duration::from_secs(2));
    assert_eq!(loaded.execution.output_cap(), DEFAULT_MAX_OUTPUT_BYTES);

    Config::mutate_at(&config_path, |config| {
        config.backend_url = None;
        config.execution = ExecutionConfig::default();
        Ok(())
    })
    .expect("mutate failed");

    let contents = std::fs::read_to_string(&config_path).expect("read back");
    assert!(!contents.contains("backend_url"));
    assert!(!contents.contains("[execution]"));
    assert!(contents.contains("request_timeout_secs = 30"));
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "backend_url = [").expect("write");

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config at"));
}

#[test]
fn execution_table_parses_from_toml() {
    let config: Config = toml::from_str(
        r#"
backend_url = "http://localhost:4000"

[execution]
timeout_secs = 10
max_output_bytes = 1024
python = "/usr/bin/python3.12"
"#,
    )
    .expect("parse");
    assert_eq!(config.execution.timeout_secs, Some(10));
    assert_eq!(config.execution.output_cap(), 1024);
    assert_eq!(config.execution.python_program(), "/usr/bin/python3.12");
    assert_eq!(config.execution.node_program(), "node");
}

#[test]
fn backend_url_precedence() {
    let config = Config {
        backend_url: Some("http://file".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.resolve_backend_url_with(Some("http://cli"), Some("http://env".into())),
        "http://cli"
    );
    assert_eq!(
        config.resolve_backend_url_with(None, Some("http://env".into())),
        "http://env"
    );
    assert_eq!(
        config.resolve_backend_url_with(None, Some("  ".into())),
        "http://file"
    );
    assert_eq!(
        Config::default().resolve_backend_url_with(None, None),
        DEFAULT_BACKEND_URL
    );
}

#[test]
fn summary_marks_defaults() {
    let lines = Config::default().summary_lines();
    assert!(lines
        .iter()
        .any(|line| line == "  backend-url: (unset, default: http://localhost:3001)"));
    assert!(lines
        .iter()
        .any(|line| line == "  exec-timeout: (unset, default: 5)"));
}

#[test]
fn session_id_prefers_override_then_file() {
    let config = Config {
        session_id: Some("from-file".to_string()),
        ..Default::default()
    };
    assert_eq!(config.resolve_session_id(Some("cli")), "cli");
    assert_eq!(config.resolve_session_id(None), "from-file");

    let fresh = Config::default().resolve_session_id(None);
    assert!(fresh.starts_with("session-"));
    assert_ne!(fresh, Config::default().resolve_session_id(None));
}
