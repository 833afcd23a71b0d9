//! Structured logging for rf-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for CI and build pipelines
//!
//! stdout is reserved for command payloads; every log line goes to stderr.

pub mod config;

pub use config::{cli_level, LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown at the configured level.
const LOG_TARGETS: &[&str] = &["rf_core", "rf_redact", "rf_codegen", "rf_common"];

/// Build the filter directive string for a config.
///
/// Raw `RUST_LOG` directives are passed through untouched; otherwise every
/// workspace crate gets the configured level.
pub fn filter_directives(config: &LogConfig) -> String {
    if let Some(ref directives) = config.rust_log {
        return directives.clone();
    }
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, config.level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging subsystem.
///
/// Call once at startup. A second call leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new(format!("rf_core={}", config.level)));

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let jsonl_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(jsonl_layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("warning: logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_cover_workspace() {
        let config = LogConfig::default().with_level(LogLevel::Debug);
        let directives = filter_directives(&config);
        assert_eq!(
            directives,
            "rf_core=debug,rf_redact=debug,rf_codegen=debug,rf_common=debug"
        );
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_filter_directives_off() {
        let config = LogConfig::default().with_level(LogLevel::Off);
        assert!(filter_directives(&config).starts_with("rf_core=off"));
    }

    #[test]
    fn test_filter_directives_rust_log_passthrough() {
        let config = LogConfig {
            rust_log: Some("rf_redact::request=info".into()),
            ..LogConfig::default()
        };
        assert_eq!(filter_directives(&config), "rf_redact::request=info");
    }
}
