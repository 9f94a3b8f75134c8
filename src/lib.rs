//! Online Store Admin - server-rendered administration for a small storefront
//! 
//! Categories, products (each with an optional one-to-one detail record) and
//! customer orders with their product lines, managed through HTML forms.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod web;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use anyhow::Result;

use crate::application::AppState;
use crate::infrastructure::{AppConfig, DatabaseConnection, logging};

/// Connect, migrate, optionally seed, and serve until shutdown.
pub async fn run(config: AppConfig) -> Result<()> {
    logging::log_system_info();

    let db = DatabaseConnection::from_config(&config.database).await?;
    db.migrate().await?;
    if config.database.seed_sample_data {
        db.seed_sample_data().await?;
    }

    let address = config.bind_address();
    let state = AppState::new(db.pool().clone(), &config);

    web::serve(state, &address).await
}
