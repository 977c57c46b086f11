//! Desktop clipboard access through helper programs.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

/// A program that copies whatever it reads on stdin.
#[derive(Debug, Clone, Copy)]
pub struct ClipboardHelper {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
pub const HELPERS: &[ClipboardHelper] = &[ClipboardHelper {
    program: "pbcopy",
    args: &[],
}];

#[cfg(target_os = "windows")]
pub const HELPERS: &[ClipboardHelper] = &[ClipboardHelper {
    program: "cmd",
    args: &["/C", "clip"],
}];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const HELPERS: &[ClipboardHelper] = &[
    ClipboardHelper {
        program: "wl-copy",
        args: &[],
    },
    ClipboardHelper {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    ClipboardHelper {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
];

impl ClipboardHelper {
    pub fn copy(&self, text: &str) -> Result<(), String> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| format!("`{}` not available", self.program))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let status = child
            .wait()
            .map_err(|err| format!("`{}` failed: {err}", self.program))?;
        match (written, status.success()) {
            (Ok(()), true) => Ok(()),
            (Err(err), _) => Err(format!("`{}` failed: {err}", self.program)),
            (Ok(()), false) => Err(format!("`{}` failed: {status}", self.program)),
        }
    }
}

/// Copy `text` with the first helper that works.
pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    copy_with(HELPERS, text)
}

pub(crate) fn copy_with(helpers: &[ClipboardHelper], text: &str) -> Result<(), String> {
    let mut failures = Vec::new();
    for helper in helpers {
        match helper.copy(text) {
            Ok(()) => {
                debug!(program = helper.program, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(err) => failures.push(err),
        }
    }
    Err(format!(
        "no clipboard helper worked ({})",
        failures.join("; ")
    ))
}
