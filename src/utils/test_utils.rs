use crate::core::app::{App, AppInitConfig};
use crate::core::code_actions::Clipboard;
use crate::core::config::ExecutionConfig;
use std::sync::{Arc, Mutex};

/// Clipboard that remembers what was copied.
#[derive(Clone, Default)]
pub struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.0.lock().expect("clipboard lock").clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), String> {
        self.0.lock().expect("clipboard lock").push(text.to_string());
        Ok(())
    }
}

pub fn create_test_app() -> App {
    create_test_app_with_clipboard(RecordingClipboard::default())
}

pub fn create_test_app_with_clipboard(clipboard: RecordingClipboard) -> App {
    App::new(AppInitConfig {
        session_id: "test-session".to_string(),
        clipboard: Box::new(clipboard),
        execution: ExecutionConfig::default(),
        log_file: None,
        transcript: None,
    })
    .expect("test app")
}
