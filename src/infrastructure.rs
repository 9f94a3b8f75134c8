//! Infrastructure layer for database connections, repositories, and configuration
//! 
//! This module provides the SQLite pool and schema, the repository
//! implementations behind the domain traits, configuration loading, and the
//! logging setup.

pub mod config;
pub mod database_connection;
pub mod logging;
pub mod repositories;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError};
pub use database_connection::DatabaseConnection;
pub use repositories::{SqliteCategoryRepository, SqliteOrderRepository, SqliteProductRepository};
