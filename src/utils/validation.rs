//! Input validation primitives.
//!
//! Required configuration values are checked with these helpers so every
//! missing key surfaces as the same `config.missing_key` error shape.

use crate::error::{Error, Result};

/// Require an Option to contain a non-empty string.
pub fn require_config<'a>(
    value: Option<&'a str>,
    key: &str,
    config_path: Option<&str>,
) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::config_missing_key(key, config_path.map(str::to_string))
            .with_hint(format!(
                "Set '{}' in sheetsite.json or export SHEETSITE_{}",
                key,
                key.to_ascii_uppercase()
            ))),
    }
}
