//! Data Transfer Objects for the admin forms
//! 
//! Form DTOs mirror the posted field names of the HTML pages. Binding turns the raw
//! strings into domain drafts and records binder errors (missing or unparseable
//! numbers) the same way validation errors are recorded, so both end up in one list.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::entities::{
    Category, CategoryDraft, Order, OrderDraft, ProductDetailDraft, ProductDraft,
    ProductWithDetails,
};
use crate::domain::validation::ValidationErrors;

const ORDER_DATE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Value of a posted field with empty strings treated as absent.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<&String>) -> Option<String> {
    present(value).map(str::to_string)
}

fn required_error(errors: &mut ValidationErrors, field: &str) {
    errors.push(field, format!("The {field} field is required."));
}

fn invalid_value_error(errors: &mut ValidationErrors, field: &str, raw: &str) {
    errors.push(field, format!("The value '{raw}' is not valid for {field}."));
}

fn parse_id(value: Option<&String>) -> Option<i64> {
    present(value).and_then(|v| v.trim().parse().ok())
}

// ============================================================================
// Category DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(rename = "Name")]
    pub name: Option<String>,
}

impl CategoryForm {
    #[must_use]
    pub fn bind(&self) -> (CategoryDraft, ValidationErrors) {
        let draft = CategoryDraft {
            name: self.name.clone().unwrap_or_default().trim().to_string(),
        };
        (draft, ValidationErrors::new())
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: Some(category.name.clone()),
        }
    }
}

// ============================================================================
// Product DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(rename = "ProductId")]
    pub product_id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
    #[serde(rename = "CategoryId")]
    pub category_id: Option<String>,
    #[serde(rename = "ProductDetail.ProductDetailId")]
    pub detail_id: Option<String>,
    #[serde(rename = "ProductDetail.Description")]
    pub description: Option<String>,
    #[serde(rename = "ProductDetail.Specifications")]
    pub specifications: Option<String>,
}

/// Posted `ProductId` of an edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedId {
    Absent,
    Parsed(i64),
    Malformed,
}

impl ProductForm {
    /// A detail counts as posted when any `ProductDetail.*` field is present.
    #[must_use]
    pub const fn has_detail(&self) -> bool {
        self.detail_id.is_some() || self.description.is_some() || self.specifications.is_some()
    }

    #[must_use]
    pub fn posted_product_id(&self) -> PostedId {
        match present(self.product_id.as_ref()) {
            None => PostedId::Absent,
            Some(raw) => raw
                .trim()
                .parse()
                .map_or(PostedId::Malformed, PostedId::Parsed),
        }
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<i64> {
        parse_id(self.category_id.as_ref())
    }

    #[must_use]
    pub fn bind(&self) -> (ProductDraft, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let price = match present(self.price.as_ref()) {
            None => {
                required_error(&mut errors, "Price");
                0.0
            }
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(price) if price.is_finite() => price,
                _ => {
                    invalid_value_error(&mut errors, "Price", raw);
                    0.0
                }
            },
        };

        let detail = self.has_detail().then(|| ProductDetailDraft {
            id: parse_id(self.detail_id.as_ref()),
            description: non_empty(self.description.as_ref()),
            specifications: non_empty(self.specifications.as_ref()),
        });

        let draft = ProductDraft {
            name: self.name.clone().unwrap_or_default(),
            price,
            category_id: self.selected_category().unwrap_or(0),
            detail,
        };

        (draft, errors)
    }
}

impl From<&ProductWithDetails> for ProductForm {
    fn from(value: &ProductWithDetails) -> Self {
        let product = &value.product;
        let detail = value.details.as_ref();
        Self {
            product_id: Some(product.id.to_string()),
            name: Some(product.name.clone()),
            price: Some(product.price.to_string()),
            category_id: Some(product.category_id.to_string()),
            detail_id: detail.filter(|d| d.id > 0).map(|d| d.id.to_string()),
            description: detail.and_then(|d| d.description.clone()),
            specifications: detail.and_then(|d| d.specifications.clone()),
        }
    }
}

// ============================================================================
// Order DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    #[serde(rename = "OrderDate")]
    pub order_date: Option<String>,
    #[serde(rename = "CustomerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "CustomerEmail")]
    pub customer_email: Option<String>,
}

fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ORDER_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl OrderForm {
    #[must_use]
    pub fn bind(&self) -> (OrderDraft, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let order_date = match present(self.order_date.as_ref()) {
            None => {
                required_error(&mut errors, "OrderDate");
                NaiveDateTime::default()
            }
            Some(raw) => parse_order_date(raw).unwrap_or_else(|| {
                invalid_value_error(&mut errors, "OrderDate", raw);
                NaiveDateTime::default()
            }),
        };

        let draft = OrderDraft {
            order_date,
            customer_name: self.customer_name.clone().unwrap_or_default().trim().to_string(),
            customer_email: non_empty(self.customer_email.as_ref()).map(|e| e.trim().to_string()),
        };

        (draft, errors)
    }
}

impl From<&Order> for OrderForm {
    fn from(order: &Order) -> Self {
        Self {
            order_date: Some(order.order_date.format("%Y-%m-%dT%H:%M").to_string()),
            customer_name: Some(order.customer_name.clone()),
            customer_email: order.customer_email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderLineForm {
    #[serde(rename = "ProductId")]
    pub product_id: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
}

/// Bound order line: product id (0 when missing) and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineInput {
    pub product_id: i64,
    pub quantity: i64,
}

impl OrderLineForm {
    #[must_use]
    pub fn bind(&self) -> (OrderLineInput, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let quantity = match present(self.quantity.as_ref()) {
            None => {
                required_error(&mut errors, "Quantity");
                0
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                invalid_value_error(&mut errors, "Quantity", raw);
                0
            }),
        };

        let input = OrderLineInput {
            product_id: parse_id(self.product_id.as_ref()).unwrap_or(0),
            quantity,
        };

        (input, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Product, ProductDetail};

    fn form(price: Option<&str>) -> ProductForm {
        ProductForm {
            name: Some("Keczup".into()),
            price: price.map(str::to_string),
            category_id: Some("1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_price_is_required_error() {
        let (draft, errors) = form(None).bind();
        assert!(errors.contains("Price", "The Price field is required."));
        assert!(draft.price.abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_price_echoes_raw_value() {
        let (_, errors) = form(Some("abc")).bind();
        assert!(errors.contains("Price", "The value 'abc' is not valid for Price."));
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let (_, errors) = form(Some("NaN")).bind();
        assert_eq!(errors.for_field("Price").count(), 1);
    }

    #[test]
    fn detail_is_absent_without_detail_fields() {
        let (draft, _) = form(Some("12")).bind();
        assert!(draft.detail.is_none());
    }

    #[test]
    fn empty_detail_fields_still_post_a_detail() {
        let mut posted = form(Some("12"));
        posted.description = Some(String::new());
        let (draft, _) = posted.bind();

        let detail = draft.detail.expect("detail posted");
        assert_eq!(detail.description, None);
        assert!(detail.is_new());
    }

    #[test]
    fn posted_product_id_variants() {
        let mut posted = form(Some("1"));
        assert_eq!(posted.posted_product_id(), PostedId::Absent);
        posted.product_id = Some("5".into());
        assert_eq!(posted.posted_product_id(), PostedId::Parsed(5));
        posted.product_id = Some("five".into());
        assert_eq!(posted.posted_product_id(), PostedId::Malformed);
    }

    #[test]
    fn product_form_round_trips_loaded_product() {
        let loaded = ProductWithDetails {
            product: Product { id: 3, name: "Keczup".into(), price: 12.5, category_id: 2 },
            category_name: Some("Sosy".into()),
            details: Some(ProductDetail {
                id: 9,
                product_id: 3,
                description: Some("Pyszny".into()),
                specifications: None,
            }),
        };
        let (draft, errors) = ProductForm::from(&loaded).bind();

        assert!(errors.is_empty());
        assert_eq!(draft.category_id, 2);
        assert_eq!(draft.detail.and_then(|d| d.id), Some(9));
    }

    #[test]
    fn order_date_accepts_datetime_local_and_plain_date() {
        for raw in ["2024-03-01T12:30", "2024-03-01"] {
            let (_, errors) = OrderForm {
                order_date: Some(raw.into()),
                customer_name: Some("Jan".into()),
                customer_email: None,
            }
            .bind();
            assert!(errors.is_empty(), "{raw} should parse");
        }
    }

    #[test]
    fn order_line_quantity_binding() {
        let (input, errors) = OrderLineForm {
            product_id: Some("4".into()),
            quantity: Some("x".into()),
        }
        .bind();
        assert_eq!(input.product_id, 4);
        assert!(errors.contains("Quantity", "The value 'x' is not valid for Quantity."));
    }
}
