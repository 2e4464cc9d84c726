//! # Structured Logging Module
//!
//! Environment-aware structured logging that outputs to the console and to a
//! JSON log file for request and document-generation tracing.

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// `RUST_LOG` wins over the environment default when it is set. File output is
/// skipped (console only) when the log directory cannot be created.
pub fn init_structured_logging(environment: &str) {
    LOGGER_GUARD.get_or_init(|| {
        let log_level = get_log_level(environment);
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
        };

        let pid = process::id();
        let log_dir = PathBuf::from("log");
        let file_writer = match fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
                let file_name = format!("{environment}.{pid}.{timestamp}.log");
                let appender = tracing_appender::rolling::never(&log_dir, file_name);
                Some(tracing_appender::non_blocking(appender))
            }
            Err(_) => None,
        };

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(environment != "production")
            .with_filter(filter());

        let (file_layer, guard) = match file_writer {
            Some((writer, guard)) => (
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(filter()),
                ),
                Some(guard),
            ),
            None => (None, None),
        };

        // A subscriber may already be installed (tests, embedding); keep it.
        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = pid,
            environment = %environment,
            log_dir = %log_dir.display(),
            "Structured logging initialized"
        );

        guard
    });
}

/// Get default log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}

/// Log structured data for contract lifecycle operations
pub fn log_contract_operation(
    operation: &str,
    contract_number: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        contract_number = contract_number,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "CONTRACT_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "warn");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("staging"), "debug");
    }
}
