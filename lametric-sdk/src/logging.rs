//! Logging setup for applications using the SDK
//!
//! The SDK only emits `tracing` events; installing a subscriber is up to the
//! application. These helpers install one configured for common cases.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber; events are dropped
    Silent,
    /// Compact stderr output for development
    Development,
    /// Verbose diagnostics with source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// Call this once, before the first SDK operation.
///
/// # Environment Variables
///
/// - `LAMETRIC_LOG_LEVEL`: filter directive such as `debug` or
///   `lametric_discovery=trace`; falls back to `RUST_LOG`
///
/// # Examples
///
/// ```rust,no_run
/// use lametric_sdk::logging::{init_logging, LoggingMode};
///
/// init_logging(LoggingMode::Development).unwrap();
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info");

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug");

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Parse a `LAMETRIC_LOG_MODE` value; anything unrecognized is silent
pub fn mode_from_str(value: &str) -> LoggingMode {
    match value.trim().to_ascii_lowercase().as_str() {
        "development" | "dev" => LoggingMode::Development,
        "debug" => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    }
}

/// Initialize logging from the `LAMETRIC_LOG_MODE` environment variable
/// (`silent`, `development` or `debug`; silent when unset)
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("LAMETRIC_LOG_MODE")
        .map(|value| mode_from_str(&value))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("LAMETRIC_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Whether a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(mode_from_str("debug"), LoggingMode::Debug);
        assert_eq!(mode_from_str("Development"), LoggingMode::Development);
        assert_eq!(mode_from_str("verbose"), LoggingMode::Silent);
        assert_eq!(mode_from_str(""), LoggingMode::Silent);
    }
}
