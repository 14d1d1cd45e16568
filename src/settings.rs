//! Settings store, read with the same names a Django settings module uses.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{AnalyticalError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "KISS_METRICS_API_KEY")]
    pub kiss_metrics_api_key: Option<String>,
    /// Falls back to `DEBUG` when unset.
    #[serde(rename = "METRICS_DISABLED")]
    pub metrics_disabled: Option<bool>,
    #[serde(rename = "DEBUG")]
    pub debug: bool,
    /// Default: true.
    #[serde(rename = "ANALYTICAL_AUTO_IDENTIFY")]
    pub analytical_auto_identify: Option<bool>,
    #[serde(rename = "KISS_METRICS_INTERNAL_IPS")]
    pub kiss_metrics_internal_ips: Vec<String>,
    #[serde(rename = "ANALYTICAL_INTERNAL_IPS")]
    pub analytical_internal_ips: Vec<String>,
    #[serde(rename = "INTERNAL_IPS")]
    pub internal_ips: Vec<String>,
}

impl Settings {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.kiss_metrics_api_key = Some(key.into());
        self
    }

    /// Whether tracking output should be commented out for every visitor.
    pub fn effective_metrics_disabled(&self) -> bool {
        self.metrics_disabled.unwrap_or(self.debug)
    }

    pub fn effective_auto_identify(&self) -> bool {
        self.analytical_auto_identify.unwrap_or(true)
    }

    /// First non-empty list of internal addresses, most specific first.
    pub fn effective_internal_ips(&self) -> &[String] {
        [
            &self.kiss_metrics_internal_ips,
            &self.analytical_internal_ips,
            &self.internal_ips,
        ]
        .into_iter()
        .find(|ips| !ips.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
    }
}

/// Return `value` for the setting named `setting` if it matches `value_re`.
pub fn get_required_setting(
    setting: &'static str,
    value: Option<&str>,
    value_re: &Regex,
    invalid_msg: &str,
) -> Result<String> {
    let value = value.ok_or_else(|| AnalyticalError::setting(setting, "not found"))?;
    if !value_re.is_match(value) {
        return Err(AnalyticalError::setting(
            setting,
            format!("{invalid_msg}: '{value}'"),
        ));
    }
    Ok(value.to_string())
}
