//! Text setting handlers.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{joined_value, success_set, success_unset, validate_url};
use crate::cli::settings::SettingHandler;
use crate::core::config::Config;

/// Data-driven handler for free-text settings, with an optional validator
/// that may also normalize the value.
pub struct TextHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    validate: Option<fn(&'static str, &str) -> Result<String, SettingError>>,
    set_field: fn(&mut Config, Option<String>),
}

impl SettingHandler for TextHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = joined_value(
            args,
            SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            },
        )?;
        let value = match self.validate {
            Some(validate) => validate(self.key, &input)?,
            None => input,
        };
        let message = success_set(self.key, &value);
        (self.set_field)(config, Some(value));
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        (self.set_field)(config, None);
        Ok(success_unset(self.key))
    }
}

/// Create a handler for the `backend-url` setting.
pub fn backend_url_handler() -> TextHandler {
    TextHandler {
        key: "backend-url",
        hint: "To set the agent backend, specify its base URL:",
        example: "lumina set backend-url http://localhost:3001",
        validate: Some(validate_url),
        set_field: |c, v| c.backend_url = v,
    }
}

/// Create a handler for the `session-id` setting.
pub fn session_id_handler() -> TextHandler {
    TextHandler {
        key: "session-id",
        hint: "To pin the session id, specify it:",
        example: "lumina set session-id my-laptop",
        validate: None,
        set_field: |c, v| c.session_id = v,
    }
}

/// Create a handler for the `python` setting.
pub fn python_handler() -> TextHandler {
    TextHandler {
        key: "python",
        hint: "To choose the Python interpreter, specify the program:",
        example: "lumina set python python3.12",
        validate: None,
        set_field: |c, v| c.execution.python = v,
    }
}

/// Create a handler for the `node` setting.
pub fn node_handler() -> TextHandler {
    TextHandler {
        key: "node",
        hint: "To choose the JavaScript runtime, specify the program:",
        example: "lumina set node /usr/local/bin/node",
        validate: None,
        set_field: |c, v| c.execution.node = v,
    }
}
