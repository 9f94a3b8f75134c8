//! Repository implementations for the storefront
//! 
//! Contains the SQLite implementations of the domain repository traits.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::entities::{
    Category, CategoryDraft, Order, OrderDraft, OrderLine, OrderProduct, OrderSummary,
    OrderWithLines, Product, ProductDetail, ProductDraft, ProductWithDetails,
};
use crate::domain::repositories::{
    CategoryRepository, OrderRepository, ProductRepository, RepositoryError,
};

// ============================================================================
// CategoryRepository Implementation
// ============================================================================

pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &SqliteRow) -> Result<Category> {
        Ok(Category {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<i64> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(&draft.name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, draft: &CategoryDraft) -> Result<()> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(&draft.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Concurrency { entity: "category", id }.into());
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// ProductRepository Implementation
// ============================================================================

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &SqliteRow) -> Result<Product> {
        Ok(Product {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            category_id: row.try_get("category_id")?,
        })
    }

    fn row_to_detail(row: &SqliteRow) -> Result<Option<ProductDetail>> {
        let detail_id: Option<i64> = row.try_get("detail_id")?;
        let Some(id) = detail_id else {
            return Ok(None);
        };

        Ok(Some(ProductDetail {
            id,
            product_id: row.try_get("id")?,
            description: row.try_get("description")?,
            specifications: row.try_get("specifications")?,
        }))
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_all(&self) -> Result<Vec<ProductWithDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.price, p.category_id, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ProductWithDetails {
                    product: Self::row_to_product(row)?,
                    category_name: row.try_get("category_name")?,
                    details: None,
                })
            })
            .collect()
    }

    async fn find_with_details(&self, id: i64) -> Result<Option<ProductWithDetails>> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.name, p.price, p.category_id, c.name AS category_name,
                   d.id AS detail_id, d.description, d.specifications
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN product_details d ON d.product_id = p.id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ProductWithDetails {
                product: Self::row_to_product(&row)?,
                category_name: row.try_get("category_name")?,
                details: Self::row_to_detail(&row)?,
            })),
            None => Ok(None),
        }
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_with_detail(&self, draft: &ProductDraft) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let product_id = sqlx::query("INSERT INTO products (name, price, category_id) VALUES (?, ?, ?)")
            .bind(&draft.name)
            .bind(draft.price)
            .bind(draft.category_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        if let Some(detail) = &draft.detail {
            sqlx::query(
                "INSERT INTO product_details (product_id, description, specifications) VALUES (?, ?, ?)",
            )
            .bind(product_id)
            .bind(&detail.description)
            .bind(&detail.specifications)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(product_id)
    }

    async fn update_with_detail(&self, id: i64, draft: &ProductDraft) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE products SET name = ?, price = ?, category_id = ? WHERE id = ?")
            .bind(&draft.name)
            .bind(draft.price)
            .bind(draft.category_id)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(RepositoryError::Concurrency { entity: "product", id }.into());
        }

        if let Some(detail) = &draft.detail {
            if detail.is_new() {
                // product_id is unique: one detail row per product.
                sqlx::query(
                    r#"
                    INSERT INTO product_details (product_id, description, specifications)
                    VALUES (?, ?, ?)
                    ON CONFLICT (product_id) DO UPDATE
                    SET description = excluded.description, specifications = excluded.specifications
                    "#,
                )
                .bind(id)
                .bind(&detail.description)
                .bind(&detail.specifications)
                .execute(&mut *tx)
                .await?;
            } else {
                let detail_id = detail.id.unwrap_or_default();
                let updated = sqlx::query(
                    "UPDATE product_details SET description = ?, specifications = ? WHERE id = ? AND product_id = ?",
                )
                .bind(&detail.description)
                .bind(&detail.specifications)
                .bind(detail_id)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
                if updated == 0 {
                    return Err(RepositoryError::Concurrency { entity: "product detail", id: detail_id }.into());
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM product_details WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}

// ============================================================================
// OrderRepository Implementation
// ============================================================================

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &SqliteRow) -> Result<Order> {
        Ok(Order {
            id: row.try_get("id")?,
            order_date: row.try_get("order_date")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
        })
    }

    fn row_to_line(row: &SqliteRow) -> Result<OrderLine> {
        Ok(OrderLine {
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            unit_price: row.try_get("unit_price")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn find_all(&self) -> Result<Vec<OrderSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.order_date, o.customer_name, o.customer_email,
                   COUNT(op.product_id) AS line_count,
                   COALESCE(SUM(op.quantity), 0) AS total_quantity
            FROM orders o
            LEFT JOIN order_products op ON op.order_id = o.id
            GROUP BY o.id
            ORDER BY o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(OrderSummary {
                    order: Self::row_to_order(row)?,
                    line_count: row.try_get("line_count")?,
                    total_quantity: row.try_get("total_quantity")?,
                })
            })
            .collect()
    }

    async fn find_with_lines(&self, id: i64) -> Result<Option<OrderWithLines>> {
        let row = sqlx::query(
            "SELECT id, order_date, customer_name, customer_email FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Self::row_to_order(&row)?;

        let lines = sqlx::query(
            r#"
            SELECT op.product_id, p.name AS product_name, p.price AS unit_price, op.quantity
            FROM order_products op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = ?
            ORDER BY p.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(Self::row_to_line)
        .collect::<Result<Vec<_>>>()?;

        Ok(Some(OrderWithLines { order, lines }))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, draft: &OrderDraft) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO orders (order_date, customer_name, customer_email) VALUES (?, ?, ?)",
        )
        .bind(draft.order_date)
        .bind(&draft.customer_name)
        .bind(&draft.customer_email)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, draft: &OrderDraft) -> Result<()> {
        let result = sqlx::query(
            "UPDATE orders SET order_date = ?, customer_name = ?, customer_email = ? WHERE id = ?",
        )
        .bind(draft.order_date)
        .bind(&draft.customer_name)
        .bind(&draft.customer_email)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Concurrency { entity: "order", id }.into());
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_line(&self, line: &OrderProduct) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_products (order_id, product_id, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT (order_id, product_id) DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(line.order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_line(&self, order_id: i64, product_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM order_products WHERE order_id = ? AND product_id = ?")
            .bind(order_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ProductDetailDraft;
    use crate::infrastructure::DatabaseConnection;

    async fn setup_test_db() -> Result<SqlitePool> {
        let db = DatabaseConnection::new("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db.pool().clone())
    }

    fn draft(category_id: i64, detail: Option<ProductDetailDraft>) -> ProductDraft {
        ProductDraft {
            name: "Keczup".to_string(),
            price: 12.0,
            category_id,
            detail,
        }
    }

    #[tokio::test]
    async fn test_category_repository() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SqliteCategoryRepository::new(pool);

        let id = repo.create(&CategoryDraft { name: "Sosy".into() }).await?;
        assert!(repo.exists(id).await?);

        repo.update(id, &CategoryDraft { name: "Przyprawy".into() }).await?;
        assert_eq!(repo.find_by_id(id).await?.map(|c| c.name), Some("Przyprawy".to_string()));

        assert!(repo.delete(id).await?);
        assert!(!repo.delete(id).await?);
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_of_missing_category_is_concurrency_error() -> Result<()> {
        let pool = setup_test_db().await?;
        let repo = SqliteCategoryRepository::new(pool);

        let err = repo.update(9, &CategoryDraft { name: "x".into() }).await.unwrap_err();

        assert!(RepositoryError::is_concurrency(&err));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_with_detail_round_trip() -> Result<()> {
        let pool = setup_test_db().await?;
        let categories = SqliteCategoryRepository::new(pool.clone());
        let products = SqliteProductRepository::new(pool);
        let category_id = categories.create(&CategoryDraft { name: "Sosy".into() }).await?;

        let id = products
            .create_with_detail(&draft(
                category_id,
                Some(ProductDetailDraft {
                    id: None,
                    description: Some("Pyszny".into()),
                    specifications: None,
                }),
            ))
            .await?;

        let found = products.find_with_details(id).await?.expect("product stored");
        assert_eq!(found.category_name.as_deref(), Some("Sosy"));
        assert_eq!(found.details.and_then(|d| d.description), Some("Pyszny".to_string()));
        assert_eq!(products.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_detail_insert_rolls_back_product() -> Result<()> {
        let pool = setup_test_db().await?;
        let products = SqliteProductRepository::new(pool);

        // No category 5: the foreign key rejects the product row.
        let result = products.create_with_detail(&draft(5, Some(ProductDetailDraft::default()))).await;

        assert!(result.is_err());
        assert_eq!(products.count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_stale_detail_id_is_concurrency_error() -> Result<()> {
        let pool = setup_test_db().await?;
        let categories = SqliteCategoryRepository::new(pool.clone());
        let products = SqliteProductRepository::new(pool);
        let category_id = categories.create(&CategoryDraft { name: "Sosy".into() }).await?;
        let id = products.create_with_detail(&draft(category_id, None)).await?;

        let stale = draft(
            category_id,
            Some(ProductDetailDraft { id: Some(404), ..Default::default() }),
        );
        let err = products.update_with_detail(id, &stale).await.unwrap_err();

        assert!(RepositoryError::is_concurrency(&err));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_category_cascades_to_products() -> Result<()> {
        let pool = setup_test_db().await?;
        let categories = SqliteCategoryRepository::new(pool.clone());
        let products = SqliteProductRepository::new(pool);
        let category_id = categories.create(&CategoryDraft { name: "Sosy".into() }).await?;
        products
            .create_with_detail(&draft(category_id, Some(ProductDetailDraft::default())))
            .await?;

        categories.delete(category_id).await?;

        assert_eq!(products.count().await?, 0);
        Ok(())
    }
}
