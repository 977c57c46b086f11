//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    backend_url_handler, exec_timeout_handler, max_output_bytes_handler, node_handler,
    preview_dir_handler, python_handler, request_timeout_handler, session_id_handler,
    transcript_handler,
};
use super::SettingHandler;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in the order `lumina config` lists them.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(backend_url_handler()));
        registry.register(Box::new(session_id_handler()));
        registry.register(Box::new(request_timeout_handler()));
        registry.register(Box::new(transcript_handler()));
        registry.register(Box::new(exec_timeout_handler()));
        registry.register(Box::new(max_output_bytes_handler()));
        registry.register(Box::new(python_handler()));
        registry.register(Box::new(node_handler()));
        registry.register(Box::new(preview_dir_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
