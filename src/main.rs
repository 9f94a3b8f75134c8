use anyhow::Result;

use online_store_admin::infrastructure::{AppConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_logging_with_config(&config.logging)?;

    online_store_admin::run(config).await
}
