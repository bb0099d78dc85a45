use crate::logging::LogFormat;

/// Default log filter expression used by dispatch hosts.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Status reported for errors that carry no transport status of their own.
pub const DEFAULT_UNCLASSIFIED_STATUS: u16 = 500;

/// Default log filter expression used by dispatch hosts.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for dispatch hosts.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default status for unclassified dispatch failures.
pub fn default_unclassified_status() -> u16 {
    DEFAULT_UNCLASSIFIED_STATUS
}
