//! Application state shared by the request handlers
//! 
//! Holds the use cases wired to their repositories. Cloning is cheap: every
//! field is behind an `Arc`.

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::application::order_use_cases::OrderUseCases;
use crate::application::use_cases::{CategoryUseCases, ProductUseCases};
use crate::domain::repositories::{CategoryRepository, OrderRepository, ProductRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::repositories::{
    SqliteCategoryRepository, SqliteOrderRepository, SqliteProductRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryUseCases>,
    pub products: Arc<ProductUseCases>,
    pub orders: Arc<OrderUseCases>,
}

impl AppState {
    /// Wire the SQLite repositories over `pool`.
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let product_repo: Arc<dyn ProductRepository> =
            Arc::new(SqliteProductRepository::new(pool.clone()));
        let order_repo: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(pool));

        Self::with_repositories(category_repo, product_repo, order_repo, config)
    }

    pub fn with_repositories(
        category_repo: Arc<dyn CategoryRepository>,
        product_repo: Arc<dyn ProductRepository>,
        order_repo: Arc<dyn OrderRepository>,
        config: &AppConfig,
    ) -> Self {
        let max_products = config.store.max_products;
        info!("Application state ready (product limit {})", max_products);

        Self {
            categories: Arc::new(CategoryUseCases::new(category_repo.clone())),
            products: Arc::new(ProductUseCases::new(
                product_repo.clone(),
                category_repo,
                max_products,
            )),
            orders: Arc::new(OrderUseCases::new(order_repo, product_repo)),
        }
    }
}
