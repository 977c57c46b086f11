//! Settings management for the `set` and `unset` subcommands.
//!
//! Each configuration key has a [`SettingHandler`]. Handlers edit an
//! in-memory [`Config`]; [`apply_set`] and [`apply_unset`] wrap them in a
//! load, mutate and save cycle on the config file.
//!
//! - Text settings (`backend-url`, `session-id`, `python`, `node`)
//! - Number settings (`request-timeout`, `exec-timeout`, `max-output-bytes`)
//! - Path settings (`transcript`, `preview-dir`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use std::path::Path;

use crate::core::config::Config;
use helpers::mutate_config_at;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Store the value given by `args` (the words after the key) and return
    /// a confirmation message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;
}

pub fn apply_set(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(config_path, |config| handler.set(args, config))
}

pub fn apply_unset(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(config_path, |config| handler.unset(config))
}
