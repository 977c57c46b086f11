//! Out-of-process execution of code blocks.
//!
//! Scripts run under a vetted interpreter in a child process with an empty
//! environment (only `PATH` is passed through), a scratch working
//! directory, a wall-clock limit and capped output. Markup languages are
//! never executed; they produce a preview page instead.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::config::ExecutionConfig;
use crate::ui::markdown::CodeBlockId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    Unsupported(String),
    Spawn { program: String, message: String },
    TimedOut(Duration),
    Cancelled,
    Io(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Unsupported(language) => {
                write!(f, "Execution is not supported for {language} code blocks.")
            }
            ExecutionError::Spawn { program, message } => {
                write!(f, "could not start `{program}`: {message}")
            }
            ExecutionError::TimedOut(limit) => {
                write!(f, "timed out after {}s; the process was killed", limit.as_secs_f32())
            }
            ExecutionError::Cancelled => write!(f, "cancelled"),
            ExecutionError::Io(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ExecutionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Html,
    Css,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runner {
    Interpreter {
        program: String,
        args: Vec<String>,
        script_name: &'static str,
    },
    Preview(PreviewKind),
}

impl Runner {
    pub fn for_language(language: &str, config: &ExecutionConfig) -> Option<Runner> {
        match language.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Some(Runner::Interpreter {
                program: config.node_program().to_string(),
                args: Vec::new(),
                script_name: "main.js",
            }),
            "python" | "py" => Some(Runner::Interpreter {
                program: config.python_program().to_string(),
                args: vec!["-I".to_string()],
                script_name: "main.py",
            }),
            "html" => Some(Runner::Preview(PreviewKind::Html)),
            "css" => Some(Runner::Preview(PreviewKind::Css)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Finished(ProcessOutput),
    Preview(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SandboxLimits {
    pub timeout: Duration,
    pub max_output_bytes: usize,
    pub preview_dir: PathBuf,
}

impl From<&ExecutionConfig> for SandboxLimits {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_output_bytes: config.output_cap(),
            preview_dir: config.preview_dir(),
        }
    }
}

pub async fn execute(
    runner: &Runner,
    source: &str,
    limits: &SandboxLimits,
    cancel: &CancellationToken,
) -> Result<ExecutionOutcome, ExecutionError> {
    match runner {
        Runner::Interpreter {
            program,
            args,
            script_name,
        } => run_script(program, args, script_name, source, limits, cancel)
            .await
            .map(ExecutionOutcome::Finished),
        Runner::Preview(kind) => {
            write_preview(*kind, source, &limits.preview_dir).map(ExecutionOutcome::Preview)
        }
    }
}

async fn run_script(
    program: &str,
    args: &[String],
    script_name: &str,
    source: &str,
    limits: &SandboxLimits,
    cancel: &CancellationToken,
) -> Result<ProcessOutput, ExecutionError> {
    let workdir = tempfile::Builder::new()
        .prefix("lumina-run-")
        .tempdir()
        .map_err(|err| ExecutionError::Io(err.to_string()))?;
    let script = workdir.path().join(script_name);
    std::fs::write(&script, source).map_err(|err| ExecutionError::Io(err.to_string()))?;

    let mut command = Command::new(program);
    command
        .args(args)
        .arg(&script)
        .current_dir(workdir.path())
        .env_clear()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(path) = std::env::var_os("PATH") {
        command.env("PATH", path);
    }

    debug!(program, script = %script.display(), "spawning code run");
    let mut child = command.spawn().map_err(|err| ExecutionError::Spawn {
        program: program.to_string(),
        message: err.to_string(),
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let cap = limits.max_output_bytes;

    let finished = {
        let run = async {
            let (out, err, status) = tokio::join!(
                read_capped(stdout, cap),
                read_capped(stderr, cap),
                child.wait()
            );
            let (stdout, out_truncated) = out?;
            let (stderr, err_truncated) = err?;
            let status = status?;
            Ok::<_, std::io::Error>(ProcessOutput {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                exit_code: status.code(),
                truncated: out_truncated || err_truncated,
            })
        };
        tokio::select! {
            result = tokio::time::timeout(limits.timeout, run) => Some(result),
            _ = cancel.cancelled() => None,
        }
    };

    match finished {
        Some(Ok(result)) => result.map_err(|err| ExecutionError::Io(err.to_string())),
        Some(Err(_elapsed)) => {
            warn!(program, "code run timed out");
            let _ = child.kill().await;
            Err(ExecutionError::TimedOut(limits.timeout))
        }
        None => {
            let _ = child.kill().await;
            Err(ExecutionError::Cancelled)
        }
    }
}

/// Read at most `cap` bytes, then drain the rest so the child never blocks
/// on a full pipe.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> std::io::Result<(Vec<u8>, bool)>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok((Vec::new(), false));
    };
    let mut buf = Vec::new();
    (&mut reader)
        .take(cap as u64 + 1)
        .read_to_end(&mut buf)
        .await?;
    let truncated = buf.len() > cap;
    if truncated {
        buf.truncate(cap);
        tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    }
    Ok((buf, truncated))
}

fn write_preview(kind: PreviewKind, source: &str, dir: &Path) -> Result<PathBuf, ExecutionError> {
    let page = match kind {
        PreviewKind::Html => source.to_string(),
        PreviewKind::Css => format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>CSS preview</title>\n<style>\n{}\n</style></head>\n<body>\n<h1>Heading</h1>\n<p>Paragraph with <a href=\"#\">a link</a>.</p>\n<button>Button</button>\n</body></html>\n",
            source.replace("</style", "<\\/style")
        ),
    };
    std::fs::create_dir_all(dir).map_err(|err| ExecutionError::Io(err.to_string()))?;
    let mut file = tempfile::Builder::new()
        .prefix("lumina-preview-")
        .suffix(".html")
        .tempfile_in(dir)
        .map_err(|err| ExecutionError::Io(err.to_string()))?;
    file.write_all(page.as_bytes())
        .map_err(|err| ExecutionError::Io(err.to_string()))?;
    let (_, path) = file
        .keep()
        .map_err(|err| ExecutionError::Io(err.to_string()))?;
    Ok(path)
}

/// Text of the system turn reporting a run.
pub fn describe_outcome(
    block_id: &CodeBlockId,
    language: &str,
    result: &Result<ExecutionOutcome, ExecutionError>,
    output_cap: usize,
) -> String {
    match result {
        Ok(ExecutionOutcome::Finished(output)) => {
            let mut text = match output.exit_code {
                Some(code) => format!("Ran {block_id} ({language}), exit code {code}."),
                None => format!("Ran {block_id} ({language}), terminated by signal."),
            };
            if output.stdout.trim().is_empty() && output.stderr.trim().is_empty() {
                text.push_str("\n(no output)");
            }
            if !output.stdout.trim().is_empty() {
                text.push_str("\nstdout:\n");
                text.push_str(output.stdout.trim_end());
            }
            if !output.stderr.trim().is_empty() {
                text.push_str("\nstderr:\n");
                text.push_str(output.stderr.trim_end());
            }
            if output.truncated {
                text.push_str(&format!("\n[output truncated at {output_cap} bytes]"));
            }
            text
        }
        Ok(ExecutionOutcome::Preview(path)) => {
            format!(
                "Preview of {block_id} ({language}) written to {}",
                path.display()
            )
        }
        Err(err @ ExecutionError::Unsupported(_)) => err.to_string(),
        Err(err) => format!("Running {block_id} ({language}) failed: {err}"),
    }
}

#[derive(Debug)]
pub enum ExecutionEvent {
    Finished {
        epoch: u64,
        block_id: CodeBlockId,
        language: String,
        result: Result<ExecutionOutcome, ExecutionError>,
    },
}

pub struct ExecutionJob {
    pub block_id: CodeBlockId,
    pub language: String,
    pub source: String,
    pub runner: Runner,
    /// Conversation epoch the run was started in.
    pub epoch: u64,
    pub cancel: CancellationToken,
}

#[derive(Clone)]
pub struct ExecutionService {
    limits: Arc<SandboxLimits>,
    tx: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ExecutionService {
    pub fn new(limits: SandboxLimits) -> (Self, mpsc::UnboundedReceiver<ExecutionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                limits: Arc::new(limits),
                tx,
            },
            rx,
        )
    }

    pub fn spawn_job(&self, job: ExecutionJob) {
        let limits = Arc::clone(&self.limits);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let ExecutionJob {
                block_id,
                language,
                source,
                runner,
                epoch,
                cancel,
            } = job;
            let result = execute(&runner, &source, &limits, &cancel).await;
            let _ = tx.send(ExecutionEvent::Finished {
                epoch,
                block_id,
                language,
                result,
            });
        });
    }
}
