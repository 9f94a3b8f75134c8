//! Domain entities
//! 
//! Contains the storefront entities and the drafts used to create or change them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: i64,
}

/// One-to-one extension of a [`Product`] holding the long-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: i64,
    pub product_id: i64,
    pub description: Option<String>,
    pub specifications: Option<String>,
}

impl ProductDetail {
    /// Unsaved detail bound to a product, used to prefill edit forms.
    #[must_use]
    pub const fn empty_for(product_id: i64) -> Self {
        Self {
            id: 0,
            product_id,
            description: None,
            specifications: None,
        }
    }
}

/// Product joined with its category name and, when loaded, its detail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithDetails {
    pub product: Product,
    pub category_name: Option<String>,
    pub details: Option<ProductDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_date: NaiveDateTime,
    pub customer_name: String,
    pub customer_email: Option<String>,
}

/// Join record between an order and a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// Order line as shown on the order page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

impl OrderLine {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order: Order,
    pub line_count: i64,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderWithLines {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

// ============================================================================
// Drafts: validated input for inserts and updates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryDraft {
    pub name: String,
}

/// Posted detail values. `id` is `None` (or 0) when the detail row does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductDetailDraft {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub specifications: Option<String>,
}

impl ProductDetailDraft {
    /// True when the draft refers to a detail row that still has to be inserted.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_none_or(|id| id == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    pub detail: Option<ProductDetailDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub order_date: NaiveDateTime,
    pub customer_name: String,
    pub customer_email: Option<String>,
}
