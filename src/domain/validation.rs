//! Field-keyed validation
//!
//! Validation is a sequence of pure checks that append `(field, message)` entries to a
//! [`ValidationErrors`] list. Checks never stop at the first failure, so a form shows
//! every problem at once. Entries keyed by the empty field are model-level messages.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::{OrderDraft, ProductDetailDraft};

pub const NAME_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const PRICE_MIN: f64 = 0.0;
pub const PRICE_MAX: f64 = 100_000.0;

/// Field key used for errors that do not belong to a single input.
pub const MODEL_LEVEL: &str = "";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Messages recorded for one field, in insertion order.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn model_level(&self) -> impl Iterator<Item = &str> {
        self.for_field(MODEL_LEVEL)
    }

    #[must_use]
    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.field == field && e.message == message)
    }

    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_product_name(errors: &mut ValidationErrors, name: &str) {
    if name.is_empty() || char_len(name) > NAME_MAX_CHARS {
        errors.push(
            "Name",
            "The Name cannot be empty or longer than 255 characters.",
        );
    }
}

pub fn validate_price(errors: &mut ValidationErrors, price: f64) {
    if price > PRICE_MAX {
        errors.push("Price", "The price is too high.");
    }
    if price < PRICE_MIN {
        errors.push("Price", "The price cannot be negative.");
    }
}

/// `exists` is the answer of the existence query against the categories table.
pub fn validate_category_reference(errors: &mut ValidationErrors, category_id: i64, exists: bool) {
    if category_id <= 0 || !exists {
        errors.push("CategoryId", "Invalid CategoryId.");
    }
}

pub fn validate_product_detail(
    errors: &mut ValidationErrors,
    detail: Option<&ProductDetailDraft>,
    required: bool,
) {
    let Some(detail) = detail else {
        if required {
            errors.push("ProductDetail", "ProductDetail is required.");
        }
        return;
    };

    if detail
        .description
        .as_deref()
        .is_some_and(|d| char_len(d) > DESCRIPTION_MAX_CHARS)
    {
        errors.push(
            "ProductDetail.Description",
            "The Description cannot be longer than 1000 characters.",
        );
    }
}

pub fn validate_category_name(errors: &mut ValidationErrors, name: &str) {
    if name.trim().is_empty() {
        errors.push("Name", "The Name field is required.");
    } else if char_len(name) > NAME_MAX_CHARS {
        errors.push("Name", "The Name cannot be longer than 255 characters.");
    }
}

pub fn validate_order(errors: &mut ValidationErrors, draft: &OrderDraft) {
    if draft.customer_name.trim().is_empty() {
        errors.push("CustomerName", "The CustomerName field is required.");
    } else if char_len(&draft.customer_name) > NAME_MAX_CHARS {
        errors.push(
            "CustomerName",
            "The CustomerName cannot be longer than 255 characters.",
        );
    }

    if let Some(email) = draft.customer_email.as_deref() {
        if !EMAIL_PATTERN.is_match(email) {
            errors.push(
                "CustomerEmail",
                "The CustomerEmail field is not a valid e-mail address.",
            );
        }
    }
}

pub fn validate_quantity(errors: &mut ValidationErrors, quantity: i64) {
    if quantity < 1 {
        errors.push("Quantity", "The Quantity must be greater than 0.");
    }
}

pub fn validate_product_reference(errors: &mut ValidationErrors, product_id: i64, exists: bool) {
    if product_id <= 0 || !exists {
        errors.push("ProductId", "Invalid ProductId.");
    }
}
