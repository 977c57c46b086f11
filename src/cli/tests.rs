use super::*;
use crate::api::{GenerateRequest, HealthStatus};
use crate::cli::health::health_lines;
use crate::cli::render::render_text;
use crate::cli::say::ask;
use crate::cli::settings::SettingError;
use crate::core::agent::{AgentBackend, AgentError};
use crate::ui::chat_loop::bootstrap_with;
use crate::utils::test_utils::RecordingClipboard;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn words(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    pub(super) struct FixedBackend(pub(super) Result<String, AgentError>);

    #[async_trait]
    impl AgentBackend for FixedBackend {
        async fn generate(&self, _request: &GenerateRequest) -> Result<String, AgentError> {
            self.0.clone()
        }

        async fn health(&self) -> Result<HealthStatus, AgentError> {
            Err(AgentError::Backend("unused".into()))
        }
    }

    pub(super) fn session_answering(
        answer: Result<String, AgentError>,
    ) -> crate::ui::chat_loop::ChatSession {
        bootstrap_with(
            &Config::default(),
            ChatOptions::default(),
            Arc::new(FixedBackend(answer)),
            Box::new(RecordingClipboard::default()),
        )
        .expect("session")
    }
}

use test_helpers::{parse_args, session_answering, words};

#[test]
fn chat_is_the_default_command() {
    let args = parse_args(&["lumina"]);
    assert!(args.command.is_none());
    assert!(args.backend_url.is_none());
}

#[test]
fn global_flags_apply_to_subcommands() {
    let argv = [
        "lumina",
        "chat",
        "--backend-url",
        "http://agent:3001",
        "--session-id",
        "abc",
        "-t",
        "/tmp/t.html",
        "-l",
        "chat.log",
    ];
    let args = parse_args(&argv);
    let options = args.chat_options();
    assert_eq!(options.backend_url.as_deref(), Some("http://agent:3001"));
    assert_eq!(options.session_id.as_deref(), Some("abc"));
    assert_eq!(options.transcript, Some(PathBuf::from("/tmp/t.html")));
    assert_eq!(options.log.as_deref(), Some("chat.log"));
    assert!(matches!(args.command, Some(Commands::Chat)));
}

#[test]
fn say_collects_the_prompt_words() {
    let args = parse_args(&["lumina", "say", "--html", "What", "is", "-x?"]);
    match args.command {
        Some(Commands::Say { html, prompt }) => {
            assert!(html);
            assert_eq!(prompt, words(&["What", "is", "-x?"]));
        }
        _ => panic!("expected say"),
    }
    assert!(Args::try_parse_from(["lumina", "say"]).is_err());
}

#[test]
fn render_takes_an_optional_file() {
    let args = parse_args(&["lumina", "render", "--classify"]);
    assert!(matches!(
        args.command,
        Some(Commands::Render {
            file: None,
            classify: true
        })
    ));
    let args = parse_args(&["lumina", "render", "answer.txt"]);
    assert!(matches!(
        args.command,
        Some(Commands::Render { file: Some(_), classify: false })
    ));
}

#[test]
fn set_and_unset_round_trip_through_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    let registry = SettingRegistry::new();

    let message = apply_set(
        &registry,
        &path,
        "backend-url",
        &words(&["https://agent.example.com/"]),
    )
    .expect("set url");
    assert_eq!(message, "✅ Set backend-url to: https://agent.example.com");
    apply_set(&registry, &path, "exec-timeout", &words(&["9"])).expect("set timeout");
    apply_set(&registry, &path, "transcript", &words(&["/tmp/lumina.html"])).expect("set path");

    let config = Config::load_from_path(&path).expect("load");
    assert_eq!(config.backend_url.as_deref(), Some("https://agent.example.com"));
    assert_eq!(config.execution.timeout(), Duration::from_secs(9));
    assert_eq!(config.transcript, Some(PathBuf::from("/tmp/lumina.html")));

    apply_unset(&registry, &path, "exec-timeout").expect("unset");
    let config = Config::load_from_path(&path).expect("load");
    assert_eq!(config.execution.timeout_secs, None);
    assert!(config.backend_url.is_some());
}

#[test]
fn invalid_settings_leave_the_file_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    let registry = SettingRegistry::new();

    assert!(matches!(
        apply_set(&registry, &path, "backend-url", &words(&["ftp://x"])),
        Err(SettingError::InvalidValue { key: "backend-url", .. })
    ));
    assert!(matches!(
        apply_set(&registry, &path, "max-output-bytes", &words(&["0"])),
        Err(SettingError::InvalidValue { .. })
    ));
    assert!(matches!(
        apply_set(&registry, &path, "python", &[]),
        Err(SettingError::MissingArgs { .. })
    ));
    assert!(matches!(
        apply_unset(&registry, &path, "theme"),
        Err(SettingError::UnknownKey(key)) if key == "theme"
    ));
    assert!(!path.exists());
}

#[test]
fn registry_keys_match_the_config_summary() {
    let registry = SettingRegistry::new();
    let summary = Config::default().summary_lines();
    for key in registry.keys_display_order() {
        assert!(
            summary.iter().any(|line| line.starts_with(&format!("  {key}:"))),
            "{key} missing from summary"
        );
    }
}

#[tokio::test]
async fn say_returns_text_or_html() {
    let text = ask(
        session_answering(Ok("Use **bold**".into())),
        "q",
        SayFormat::Text,
    )
    .await
    .expect("answer");
    assert_eq!(text, "Use **bold**");

    let html = ask(
        session_answering(Ok("Use **bold**".into())),
        "q",
        SayFormat::Html,
    )
    .await
    .expect("answer");
    assert!(html.contains("<strong>bold</strong>"));
}

#[tokio::test]
async fn say_strips_terminal_control_sequences() {
    let text = ask(
        session_answering(Ok("\x1b]0;title\x07done\x1b[2J".into())),
        "q",
        SayFormat::Text,
    )
    .await
    .expect("answer");
    assert_eq!(text, "]0;titledone[2J");

    let err = ask(
        session_answering(Err(AgentError::Backend("bad\x1b[2J".into()))),
        "q",
        SayFormat::Text,
    )
    .await
    .expect_err("failure");
    assert!(!err.to_string().contains('\x1b'));
}

#[tokio::test]
async fn say_reports_failures_with_the_banner_prefix() {
    let err = ask(
        session_answering(Err(AgentError::Backend("No response received from agent".into()))),
        "q",
        SayFormat::Text,
    )
    .await
    .expect_err("failure");
    assert_eq!(
        err.to_string(),
        "Error communicating with the agent: No response received from agent"
    );
}

#[test]
fn render_command_prints_fragment_or_category() {
    assert_eq!(render_text("just words", true), "plain");
    let html = render_text("<b>hi</b>", false);
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
}

#[test]
fn health_lines_describe_the_backend() {
    let status: HealthStatus = serde_json::from_str(
        r#"{"status":"OK","timestamp":"2024-01-01T00:00:00Z","environment":"dev","hasApiKey":true}"#,
    )
    .expect("health json");
    let lines = health_lines("http://localhost:3001", &status);
    assert_eq!(
        lines,
        vec![
            "Backend: http://localhost:3001",
            "Status: OK",
            "Environment: dev",
            "Reported at: 2024-01-01T00:00:00Z",
            "API key configured: yes",
        ]
    );
}
