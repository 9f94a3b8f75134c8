//! Domain services
//! 
//! Business rules that combine several validation checks.

pub mod product_service;

pub use product_service::{DetailPolicy, ProductService};
