//! Application layer - Use cases and application services
//! 
//! This module contains the use cases, the form DTOs, and the shared state
//! that coordinate domain logic for the admin pages.

pub mod dto;
pub mod order_use_cases;
pub mod state;
pub mod use_cases;

// Re-export commonly used items
pub use order_use_cases::OrderUseCases;
pub use state::AppState;
pub use use_cases::{CategoryUseCases, ProductUseCases, SAVE_FAILED_MESSAGE, UseCaseError};
