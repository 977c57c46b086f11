//! Path setting handlers.

use std::path::PathBuf;

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{joined_value, success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::path_display;
use crate::core::config::Config;

pub struct PathHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    set_field: fn(&mut Config, Option<PathBuf>),
}

impl SettingHandler for PathHandler {
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
        let path = PathBuf::from(input);
        let message = success_set(self.key, &path_display(&path));
        (self.set_field)(config, Some(path));
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        (self.set_field)(config, None);
        Ok(success_unset(self.key))
    }
}

/// Create a handler for the `transcript` setting.
pub fn transcript_handler() -> PathHandler {
    PathHandler {
        key: "transcript",
        hint: "To keep an HTML transcript, specify the page path:",
        example: "lumina set transcript ~/lumina/transcript.html",
        set_field: |c, v| c.transcript = v,
    }
}

/// Create a handler for the `preview-dir` setting.
pub fn preview_dir_handler() -> PathHandler {
    PathHandler {
        key: "preview-dir",
        hint: "To choose where html/css previews go, specify a directory:",
        example: "lumina set preview-dir /tmp/lumina-previews",
        set_field: |c, v| c.execution.preview_dir = v,
    }
}
