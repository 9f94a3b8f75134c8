//! Test utilities for the store admin
//!
//! Provides common testing infrastructure so tests run against an isolated,
//! migrated in-memory database.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::application::dto::ProductForm;
use crate::application::{CategoryUseCases, OrderUseCases, ProductUseCases};
use crate::domain::entities::{CategoryDraft, ProductDraft, ProductWithDetails};
use crate::domain::repositories::{CategoryRepository, ProductRepository};
use crate::infrastructure::config::DEFAULT_MAX_PRODUCTS;
use crate::infrastructure::{
    DatabaseConnection, SqliteCategoryRepository, SqliteOrderRepository, SqliteProductRepository,
};

/// Test database configuration
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Create a new in-memory test database
    pub async fn new() -> Result<Self> {
        let db = DatabaseConnection::new("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(Self { connection: db })
    }

    /// Get the database pool for use in repositories
    pub fn pool(&self) -> sqlx::Pool<sqlx::Sqlite> {
        self.connection.pool().clone()
    }
}

/// Complete test context with all repositories and use cases
pub struct TestContext {
    pub database: TestDatabase,
    pub category_repo: Arc<SqliteCategoryRepository>,
    pub product_repo: Arc<SqliteProductRepository>,
    pub order_repo: Arc<SqliteOrderRepository>,
    pub category_use_cases: CategoryUseCases,
    pub product_use_cases: ProductUseCases,
    pub order_use_cases: OrderUseCases,
}

impl TestContext {
    /// Create a complete test context with all components initialized
    pub async fn new() -> Result<Self> {
        Self::with_max_products(DEFAULT_MAX_PRODUCTS).await
    }

    pub async fn with_max_products(max_products: u32) -> Result<Self> {
        let database = TestDatabase::new().await?;
        let pool = database.pool();

        let category_repo = Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let product_repo = Arc::new(SqliteProductRepository::new(pool.clone()));
        let order_repo = Arc::new(SqliteOrderRepository::new(pool));

        let category_use_cases = CategoryUseCases::new(category_repo.clone());
        let product_use_cases =
            ProductUseCases::new(product_repo.clone(), category_repo.clone(), max_products);
        let order_use_cases = OrderUseCases::new(order_repo.clone(), product_repo.clone());

        Ok(Self {
            database,
            category_repo,
            product_repo,
            order_repo,
            category_use_cases,
            product_use_cases,
            order_use_cases,
        })
    }

    pub async fn seed_category(&self, name: &str) -> Result<i64> {
        self.category_repo
            .create(&CategoryDraft { name: name.to_string() })
            .await
    }
}

/// A valid product form with both detail fields filled in.
pub fn product_form(name: &str, price: &str, category_id: i64) -> ProductForm {
    ProductForm {
        product_id: None,
        name: Some(name.to_string()),
        price: Some(price.to_string()),
        category_id: Some(category_id.to_string()),
        detail_id: None,
        description: Some("Pyszny keczup Pudliszki".to_string()),
        specifications: Some("W 99% z pomidorów".to_string()),
    }
}

/// Reads go to the wrapped repository; every write fails.
pub struct FailingProductRepository {
    inner: Arc<SqliteProductRepository>,
}

impl FailingProductRepository {
    pub fn new(inner: Arc<SqliteProductRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ProductRepository for FailingProductRepository {
    async fn find_all(&self) -> Result<Vec<ProductWithDetails>> {
        self.inner.find_all().await
    }

    async fn find_with_details(&self, id: i64) -> Result<Option<ProductWithDetails>> {
        self.inner.find_with_details(id).await
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        self.inner.exists(id).await
    }

    async fn count(&self) -> Result<i64> {
        self.inner.count().await
    }

    async fn create_with_detail(&self, _draft: &ProductDraft) -> Result<i64> {
        Err(anyhow!("database is locked"))
    }

    async fn update_with_detail(&self, _id: i64, _draft: &ProductDraft) -> Result<()> {
        Err(anyhow!("database is locked"))
    }

    async fn delete(&self, _id: i64) -> Result<bool> {
        Err(anyhow!("database is locked"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let db = TestDatabase::new().await.unwrap();
        assert!(!db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_context_creation() {
        let ctx = TestContext::new().await.unwrap();
        assert!(!ctx.database.pool().is_closed());
        assert!(ctx.category_use_cases.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multiple_databases_are_isolated() {
        let first = TestContext::new().await.unwrap();
        let second = TestContext::new().await.unwrap();

        first.seed_category("Sosy").await.unwrap();

        assert!(second.category_use_cases.list().await.unwrap().is_empty());
    }
}
