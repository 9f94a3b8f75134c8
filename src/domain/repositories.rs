//! Repository interfaces for the storefront
//! 
//! Contains trait definitions for data access. Implementations live in the
//! infrastructure layer.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    Category, CategoryDraft, OrderDraft, OrderProduct, OrderSummary, OrderWithLines,
    ProductDraft, ProductWithDetails,
};

/// Typed failures raised by repositories through `anyhow::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// An update matched no row: the row was removed or changed by another request.
    #[error("{entity} {id} was modified or deleted concurrently")]
    Concurrency { entity: &'static str, id: i64 },
}

impl RepositoryError {
    /// True when `err` carries a concurrency conflict.
    #[must_use]
    pub fn is_concurrency(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<Self>(),
            Some(Self::Concurrency { .. })
        )
    }
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Category>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;
    async fn exists(&self, id: i64) -> Result<bool>;
    async fn create(&self, draft: &CategoryDraft) -> Result<i64>;
    async fn update(&self, id: i64, draft: &CategoryDraft) -> Result<()>;
    /// Returns `false` when no row was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products with their category names, ordered by id. Details are not loaded.
    async fn find_all(&self) -> Result<Vec<ProductWithDetails>>;
    async fn find_with_details(&self, id: i64) -> Result<Option<ProductWithDetails>>;
    async fn exists(&self, id: i64) -> Result<bool>;
    async fn count(&self) -> Result<i64>;

    /// Inserts the product and its detail in one transaction and returns the product id.
    async fn create_with_detail(&self, draft: &ProductDraft) -> Result<i64>;

    /// Updates the product and inserts or updates its detail in one transaction.
    async fn update_with_detail(&self, id: i64, draft: &ProductDraft) -> Result<()>;

    /// Removes the detail and the product in one transaction.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<OrderSummary>>;
    async fn find_with_lines(&self, id: i64) -> Result<Option<OrderWithLines>>;
    async fn exists(&self, id: i64) -> Result<bool>;
    async fn create(&self, draft: &OrderDraft) -> Result<i64>;
    async fn update(&self, id: i64, draft: &OrderDraft) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Inserts the line or replaces the quantity of an existing one.
    async fn upsert_line(&self, line: &OrderProduct) -> Result<()>;
    async fn remove_line(&self, order_id: i64, product_id: i64) -> Result<bool>;
}
