//! Helper functions for settings operations.

use std::path::Path;

use crate::core::config::Config;
use crate::utils::url::parse_http_base_url;

use super::error::SettingError;

/// Wrapper around `Config::mutate_at` that keeps handler errors intact and
/// maps load/save failures to `SettingError::ConfigError`.
pub fn mutate_config_at<F>(config_path: &Path, f: F) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut handler_error = None;
    let outcome = Config::mutate_at(config_path, |config| match f(config) {
        Ok(message) => Ok(message),
        Err(err) => {
            let text = err.to_string();
            handler_error = Some(err);
            Err(text.into())
        }
    });
    match (outcome, handler_error) {
        (_, Some(err)) => Err(err),
        (Ok(message), None) => Ok(message),
        (Err(err), None) => Err(SettingError::ConfigError(err.to_string())),
    }
}

/// Join the words after the key, failing with `missing` when there are none.
pub fn joined_value(args: &[String], missing: SettingError) -> Result<String, SettingError> {
    let value = args.join(" ");
    if value.trim().is_empty() {
        Err(missing)
    } else {
        Ok(value.trim().to_string())
    }
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_url(key: &'static str, input: &str) -> Result<String, SettingError> {
    parse_http_base_url(input).ok_or_else(|| SettingError::InvalidValue {
        key,
        input: input.to_string(),
        expected: "an http:// or https:// URL",
    })
}

pub fn parse_positive(key: &'static str, input: &str) -> Result<u64, SettingError> {
    match input.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SettingError::InvalidValue {
            key,
            input: input.to_string(),
            expected: "a whole number greater than zero",
        }),
    }
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key} (will use default)")
}
