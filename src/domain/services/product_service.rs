//! Product domain service
//! 
//! Runs the product validation gate.

use crate::domain::entities::ProductDraft;
use crate::domain::validation::{
    ValidationErrors, validate_category_reference, validate_price, validate_product_detail,
    validate_product_name,
};

/// Whether the posted product must carry a detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPolicy {
    Required,
    Optional,
}

/// Product domain service
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductService;

impl ProductService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate product data
    ///
    /// Checks run in a fixed order (name, price, category, detail) and every failing
    /// check is recorded. `category_exists` comes from the existence query the caller
    /// ran against the categories table.
    pub fn validate_product(
        &self,
        errors: &mut ValidationErrors,
        draft: &ProductDraft,
        category_exists: bool,
        policy: DetailPolicy,
    ) {
        validate_product_name(errors, &draft.name);
        validate_price(errors, draft.price);
        validate_category_reference(errors, draft.category_id, category_exists);
        validate_product_detail(
            errors,
            draft.detail.as_ref(),
            policy == DetailPolicy::Required,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ProductDetailDraft;
    use proptest::prelude::*;

    fn valid_draft() -> ProductDraft {
        ProductDraft {
            name: "Keczup".to_string(),
            price: 12.0,
            category_id: 1,
            detail: Some(ProductDetailDraft {
                id: None,
                description: Some("Pyszny keczup".to_string()),
                specifications: Some("W 99% z pomidorów".to_string()),
            }),
        }
    }

    fn run(draft: &ProductDraft, category_exists: bool, policy: DetailPolicy) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        ProductService::new().validate_product(&mut errors, draft, category_exists, policy);
        errors
    }

    #[test]
    fn valid_product_passes() {
        assert!(run(&valid_draft(), true, DetailPolicy::Required).is_empty());
    }

    #[test]
    fn collects_every_failure_in_gate_order() {
        let draft = ProductDraft {
            name: String::new(),
            price: -1.0,
            category_id: 0,
            detail: None,
        };
        let errors = run(&draft, false, DetailPolicy::Required);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, vec!["Name", "Price", "CategoryId", "ProductDetail"]);
    }

    #[test]
    fn optional_policy_accepts_missing_detail() {
        let draft = ProductDraft { detail: None, ..valid_draft() };
        assert!(run(&draft, true, DetailPolicy::Optional).is_empty());
    }

    proptest! {
        #[test]
        fn overlong_names_are_always_rejected(extra in 1usize..300) {
            let draft = ProductDraft { name: "n".repeat(255 + extra), ..valid_draft() };
            let errors = run(&draft, true, DetailPolicy::Required);
            prop_assert!(errors.contains("Name", "The Name cannot be empty or longer than 255 characters."));
        }

        #[test]
        fn out_of_range_prices_are_always_rejected(price in prop_oneof![-1.0e9..-0.0001f64, 100_000.0001f64..1.0e9]) {
            let draft = ProductDraft { price, ..valid_draft() };
            let errors = run(&draft, true, DetailPolicy::Required);
            prop_assert_eq!(errors.for_field("Price").count(), 1);
        }

        #[test]
        fn in_range_prices_are_accepted(price in 0.0f64..=100_000.0) {
            let draft = ProductDraft { price, ..valid_draft() };
            prop_assert!(run(&draft, true, DetailPolicy::Required).is_empty());
        }
    }
}
