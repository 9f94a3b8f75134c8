//! Domain module - Core business logic and entities
//! 
//! This module contains the storefront entities, the field-keyed validation
//! rules, the repository interfaces, and the domain services that combine them.
//! 
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod entities;
pub mod repositories;
pub mod services;
pub mod validation;

pub use entities::{
    Category, CategoryDraft, Order, OrderDraft, OrderLine, OrderProduct, OrderSummary,
    OrderWithLines, Product, ProductDetail, ProductDetailDraft, ProductDraft, ProductWithDetails,
};
pub use repositories::{CategoryRepository, OrderRepository, ProductRepository, RepositoryError};
pub use validation::{FieldError, ValidationErrors};
