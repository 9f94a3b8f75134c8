//! Logging system configuration and initialization
//!
//! - Console output and optional file output (`online-store-admin.log`)
//! - Level from configuration, overridable with `RUST_LOG`
//! - Structured JSON logging (optional)

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::infrastructure::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "online-store-admin.log";

// Keeps the non-blocking file writer alive for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

const NOISY_TARGETS: &[(&str, &str)] = &[
    ("sqlx::query", "warn"),
    ("sqlx::sqlite", "warn"),
    ("hyper", "warn"),
    ("tower", "info"),
    ("tokio", "info"),
    ("runtime", "warn"),
];

/// Build the filter for a configuration.
///
/// Below TRACE, SQL statements and HTTP internals are suppressed. `RUST_LOG`
/// replaces the whole filter when set:
/// ```bash
/// RUST_LOG="debug,sqlx::query=debug" online-store-admin
/// ```
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(config))
}

fn filter_for(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::new(&config.level);

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in NOISY_TARGETS {
            if let Ok(directive) = format!("{target}={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    if let Ok(directive) = format!("online_store_admin={}", config.level).parse() {
        filter = filter.add_directive(directive);
    }

    for (module, level) in &config.module_filters {
        if let Ok(directive) = format!("{module}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    filter
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir).map_err(|e| {
            anyhow!("Failed to create log directory {:?}: {}", config.log_dir, e)
        })?;

        let (file_writer, file_guard) = non_blocking(rolling::never(&config.log_dir, LOG_FILE_NAME));
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(file_guard);
        }

        let file_layer = fmt::Layer::new().with_writer(file_writer).with_ansi(false);
        layers.push(if config.json_format {
            file_layer
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            file_layer.with_target(false).boxed()
        });
    }

    if config.console_output {
        let console_layer = fmt::Layer::new().with_writer(std::io::stdout);
        layers.push(if config.json_format && !config.file_output {
            console_layer.json().boxed()
        } else {
            console_layer.with_target(false).boxed()
        });
    }

    Registry::default()
        .with(layers)
        .with(build_env_filter(config))
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("JSON format: {}", config.json_format);
    if config.file_output {
        info!("Log file: {:?}", log_file_path(&config.log_dir));
    }

    Ok(())
}

pub fn log_file_path(log_dir: &Path) -> std::path::PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== Online Store Admin ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_filter_suppresses_sql_below_trace() {
        let filter = filter_for(&LoggingConfig::default()).to_string();

        assert!(filter.contains("sqlx::query=warn"));
        assert!(filter.contains("online_store_admin=info"));
    }

    #[test]
    fn test_trace_level_keeps_sql_logs() {
        let config = LoggingConfig {
            level: "trace".to_string(),
            ..LoggingConfig::default()
        };

        assert!(!filter_for(&config).to_string().contains("sqlx::query"));
    }

    #[test]
    fn test_module_filters_are_applied() {
        let mut config = LoggingConfig::default();
        config.module_filters.insert("tower_http".to_string(), "debug".to_string());

        assert!(filter_for(&config).to_string().contains("tower_http=debug"));
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };

        assert!(init_logging_with_config(&config).is_err());
    }

    #[test]
    fn test_log_file_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(log_file_path(dir.path()).ends_with(LOG_FILE_NAME));
    }
}
