//! Product validation gate benchmark
//!
//! Binding a posted product form and running the ordered checks happens on
//! every create and edit request.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use online_store_admin::application::dto::ProductForm;
use online_store_admin::domain::services::{DetailPolicy, ProductService};
use online_store_admin::domain::validation::ValidationErrors;

fn posted(name: &str, price: &str) -> ProductForm {
    ProductForm {
        product_id: None,
        name: Some(name.to_string()),
        price: Some(price.to_string()),
        category_id: Some("1".to_string()),
        detail_id: None,
        description: Some("Pyszny keczup Pudliszki".to_string()),
        specifications: Some("W 99% z pomidorów".to_string()),
    }
}

fn gate(form: &ProductForm) -> usize {
    let service = ProductService::new();
    let (draft, mut errors) = form.bind();
    service.validate_product(&mut errors, &draft, true, DetailPolicy::Required);
    errors.len()
}

fn validation_gate(c: &mut Criterion) {
    let valid = posted("Keczup", "12");
    let invalid = posted(&"a".repeat(300), "-1");
    let unparseable = posted("", "abc");

    c.bench_function("product gate - valid form", |b| b.iter(|| gate(black_box(&valid))));
    c.bench_function("product gate - invalid form", |b| b.iter(|| gate(black_box(&invalid))));
    c.bench_function("product gate - binder errors", |b| b.iter(|| gate(black_box(&unparseable))));

    c.bench_function("validation errors - field lookup", |b| {
        let mut errors = ValidationErrors::new();
        for field in ["Name", "Price", "CategoryId", "ProductDetail"] {
            errors.push(field, format!("The {field} is invalid."));
        }
        b.iter(|| black_box(&errors).for_field("ProductDetail").count());
    });
}

criterion_group!(benches, validation_gate);
criterion_main!(benches);
