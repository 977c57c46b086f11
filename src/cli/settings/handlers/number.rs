//! Numeric setting handlers (timeouts and size limits).

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{joined_value, parse_positive, success_set};
use crate::cli::settings::SettingHandler;
use crate::core::config::defaults::{
    DEFAULT_EXEC_TIMEOUT_SECS, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::core::config::Config;

pub struct NumberHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: u64,
    set_field: fn(&mut Config, Option<u64>),
}

impl SettingHandler for NumberHandler {
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
        let value = parse_positive(self.key, &input)?;
        (self.set_field)(config, Some(value));
        Ok(success_set(self.key, &value.to_string()))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        (self.set_field)(config, None);
        Ok(format!(
            "✅ Unset {} (will use default: {})",
            self.key, self.default_display
        ))
    }
}

/// Create a handler for the `request-timeout` setting (seconds).
pub fn request_timeout_handler() -> NumberHandler {
    NumberHandler {
        key: "request-timeout",
        hint: "To set the agent request timeout, specify seconds:",
        example: "lumina set request-timeout 90",
        default_display: DEFAULT_REQUEST_TIMEOUT_SECS,
        set_field: |c, v| c.request_timeout_secs = v,
    }
}

/// Create a handler for the `exec-timeout` setting (seconds).
pub fn exec_timeout_handler() -> NumberHandler {
    NumberHandler {
        key: "exec-timeout",
        hint: "To set the code run time limit, specify seconds:",
        example: "lumina set exec-timeout 10",
        default_display: DEFAULT_EXEC_TIMEOUT_SECS,
        set_field: |c, v| c.execution.timeout_secs = v,
    }
}

/// Create a handler for the `max-output-bytes` setting.
pub fn max_output_bytes_handler() -> NumberHandler {
    NumberHandler {
        key: "max-output-bytes",
        hint: "To cap captured output, specify a byte count:",
        example: "lumina set max-output-bytes 65536",
        default_display: DEFAULT_MAX_OUTPUT_BYTES as u64,
        set_field: |c, v| c.execution.max_output_bytes = v.map(|n| n as usize),
    }
}
