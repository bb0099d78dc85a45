//! Layered configuration shared by hosts that embed the MDM dispatchers.
//!
//! Values resolve from built-in defaults, then configuration files, then
//! `MDM_*` environment variables, and finally command-line flags. The
//! dispatch library itself never loads configuration; hosts pass a resolved
//! [`Config`] to telemetry setup and to the response policy.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_UNCLASSIFIED_STATUS, default_log_filter,
    default_log_filter_string, default_log_format, default_unclassified_status,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration for a dispatch host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MDM")]
pub struct Config {
    /// `tracing` filter expression applied to the global subscriber.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Transport status used when a failure carries no status of its own.
    #[serde(default = "default_unclassified_status")]
    #[ortho_config(default = default_unclassified_status())]
    pub unclassified_status: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            unclassified_status: default_unclassified_status(),
        }
    }
}

impl Config {
    /// Filter expression for the telemetry subscriber.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Selected log output format.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Raw status code applied to unclassified failures.
    ///
    /// The value is not validated here; consumers convert it into a
    /// transport status and reject codes outside the valid range.
    pub fn unclassified_status(&self) -> u16 {
        self.unclassified_status
    }
}
