//! Configuration infrastructure
//!
//! Settings are layered: built-in defaults, then `config/default.toml`,
//! then `config/{ONLINE_STORE_ENV}.toml`, then `ONLINE_STORE__*` environment
//! variables (`ONLINE_STORE__SERVER__PORT=8080`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PREFIX: &str = "ONLINE_STORE";
pub const ENV_SELECTOR: &str = "ONLINE_STORE_ENV";
pub const DEFAULT_MAX_PRODUCTS: u32 = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite:data/online-store.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    /// Insert the "Test Category" row on startup
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Product creation is refused once the catalog holds this many products
    pub max_products: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory holding `online-store-admin.log`
    pub log_dir: PathBuf,

    /// Module-specific log level filters (e.g., "sqlx": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/online-store.db".to_string(),
            max_connections: 10,
            seed_sample_data: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_products: DEFAULT_MAX_PRODUCTS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from("logs"),
            module_filters: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `./config`, picking the environment file from `ONLINE_STORE_ENV`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var(ENV_SELECTOR).ok();
        Self::from_dir("config", env.as_deref())
    }

    /// Load `default` and, when given, the `env` file (`development`, `test`, ...) from `dir`
    pub fn from_dir(dir: impl AsRef<Path>, env: Option<&str>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut builder = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false));

        if let Some(env) = env {
            builder = builder.add_source(config::File::from(dir.join(env)).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation {
                message: "database.max_connections must be greater than 0".to_string(),
            });
        }

        if self.store.max_products == 0 {
            return Err(ConfigError::Validation {
                message: "store.max_products must be greater than 0".to_string(),
            });
        }

        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::Validation {
                message: "at least one of logging.console_output or logging.file_output must be enabled".to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.store.max_products, 10_000);
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::from_dir(dir.path(), Some("nowhere")).unwrap();

        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.seed_sample_data);
    }

    #[test]
    fn test_environment_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 8080\n\n[store]\nmax_products = 50\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("test.toml"),
            "[database]\nurl = \"sqlite::memory:\"\nseed_sample_data = true\n",
        )
        .unwrap();

        let config = AppConfig::from_dir(dir.path(), Some("test")).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.max_products, 50);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(config.database.seed_sample_data);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[store]\nmax_products = 0\n").unwrap();

        let err = AppConfig::from_dir(dir.path(), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_validate_requires_an_output() {
        let mut config = AppConfig::default();
        config.logging.console_output = false;

        assert!(config.validate().is_err());
    }
}
