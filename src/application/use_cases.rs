//! Application use cases for the storefront catalogue
//! 
//! Each use case binds the posted form, runs validation, and only then touches the
//! repositories. Failures are reported through [`UseCaseError`] so the web layer can
//! pick between re-rendering the form, a 404, a redirect, or a 500.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::dto::{CategoryForm, PostedId, ProductForm};
use crate::domain::entities::{Category, ProductDetail, ProductDraft, ProductWithDetails};
use crate::domain::repositories::{CategoryRepository, ProductRepository, RepositoryError};
use crate::domain::services::{DetailPolicy, ProductService};
use crate::domain::validation::{ValidationErrors, validate_category_name};

/// Model-level message shown when a save fails for reasons the user cannot fix.
pub const SAVE_FAILED_MESSAGE: &str =
    "Unable to save changes. Try again, and if the problem persists, contact your system administrator.";

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{} validation error(s)", .0.len())]
    Validation(ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("product limit of {limit} reached")]
    CapacityReached { limit: u32 },

    /// Persistence failed on a path where the failure is shown as a generic message.
    #[error("unable to save changes: {0}")]
    SaveFailed(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

fn log_validation_errors(entity: &str, errors: &ValidationErrors) {
    info!("{} form is invalid", entity);
    for e in errors.iter() {
        info!(field = %e.field, "Validation error: {}", e.message);
    }
}

// ============================================================================
// Categories
// ============================================================================

pub struct CategoryUseCases {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoryUseCases {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>, UseCaseError> {
        Ok(self.category_repo.find_all().await?)
    }

    pub async fn details(&self, id: i64) -> Result<Category, UseCaseError> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("category", id))
    }

    /// Create a new category with validation
    pub async fn create(&self, form: &CategoryForm) -> Result<i64, UseCaseError> {
        let (draft, mut errors) = form.bind();
        validate_category_name(&mut errors, &draft.name);
        if !errors.is_empty() {
            log_validation_errors("Category", &errors);
            return Err(UseCaseError::Validation(errors));
        }

        match self.category_repo.create(&draft).await {
            Ok(id) => {
                info!("Category {} created: {}", id, draft.name);
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create category: {:#}", e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }

    pub async fn update(&self, id: i64, form: &CategoryForm) -> Result<(), UseCaseError> {
        let (draft, mut errors) = form.bind();
        validate_category_name(&mut errors, &draft.name);
        if !errors.is_empty() {
            log_validation_errors("Category", &errors);
            return Err(UseCaseError::Validation(errors));
        }

        match self.category_repo.update(id, &draft).await {
            Ok(()) => {
                info!("Category {} updated", id);
                Ok(())
            }
            Err(e) if RepositoryError::is_concurrency(&e) => {
                if self.category_repo.exists(id).await? {
                    Err(UseCaseError::Internal(e))
                } else {
                    warn!("Category {} disappeared during edit", id);
                    Err(UseCaseError::not_found("category", id))
                }
            }
            Err(e) => Err(UseCaseError::Internal(e)),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), UseCaseError> {
        match self.category_repo.delete(id).await {
            Ok(true) => {
                info!("Category {} deleted", id);
                Ok(())
            }
            Ok(false) => Err(UseCaseError::not_found("category", id)),
            Err(e) => {
                error!("Error deleting category {}: {:#}", id, e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }
}

// ============================================================================
// Products
// ============================================================================

pub struct ProductUseCases {
    product_repo: Arc<dyn ProductRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    service: ProductService,
    max_products: u32,
}

impl ProductUseCases {
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        max_products: u32,
    ) -> Self {
        Self {
            product_repo,
            category_repo,
            service: ProductService::new(),
            max_products,
        }
    }

    pub async fn list(&self) -> Result<Vec<ProductWithDetails>, UseCaseError> {
        Ok(self.product_repo.find_all().await?)
    }

    /// Categories offered by the product forms.
    pub async fn categories(&self) -> Result<Vec<Category>, UseCaseError> {
        Ok(self.category_repo.find_all().await?)
    }

    pub async fn details(&self, id: i64) -> Result<ProductWithDetails, UseCaseError> {
        self.product_repo
            .find_with_details(id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("product", id))
    }

    /// Product for the edit form. A product without a detail row gets an empty,
    /// unsaved detail so the form always shows the detail fields.
    pub async fn edit_form(&self, id: i64) -> Result<ProductWithDetails, UseCaseError> {
        let mut product = self.details(id).await?;
        if product.details.is_none() {
            product.details = Some(ProductDetail::empty_for(id));
        }
        Ok(product)
    }

    async fn validate(
        &self,
        form: &ProductForm,
        policy: DetailPolicy,
    ) -> Result<ProductDraft, UseCaseError> {
        let (draft, mut errors) = form.bind();
        let category_exists =
            draft.category_id > 0 && self.category_repo.exists(draft.category_id).await?;
        self.service
            .validate_product(&mut errors, &draft, category_exists, policy);

        if errors.is_empty() {
            Ok(draft)
        } else {
            log_validation_errors("Product", &errors);
            Err(UseCaseError::Validation(errors))
        }
    }

    /// Create a product together with its detail.
    ///
    /// Refused with [`UseCaseError::CapacityReached`] before any validation when the
    /// stored product count is already at the limit.
    pub async fn create(&self, form: &ProductForm) -> Result<i64, UseCaseError> {
        let count = self.product_repo.count().await?;
        if count >= i64::from(self.max_products) {
            warn!("Product limit reached ({} >= {}), create refused", count, self.max_products);
            return Err(UseCaseError::CapacityReached { limit: self.max_products });
        }

        let draft = self.validate(form, DetailPolicy::Required).await?;

        match self.product_repo.create_with_detail(&draft).await {
            Ok(id) => {
                info!("Product {} and its detail saved successfully", id);
                Ok(id)
            }
            Err(e) => {
                error!("Exception occurred while saving product: {:#}", e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }

    pub async fn update(&self, id: i64, form: &ProductForm) -> Result<(), UseCaseError> {
        match form.posted_product_id() {
            PostedId::Absent => {}
            PostedId::Parsed(posted) if posted == id => {}
            PostedId::Parsed(_) | PostedId::Malformed => {
                return Err(UseCaseError::not_found("product", id));
            }
        }

        let draft = self.validate(form, DetailPolicy::Optional).await?;

        match self.product_repo.update_with_detail(id, &draft).await {
            Ok(()) => {
                info!("Product {} updated", id);
                Ok(())
            }
            Err(e) if RepositoryError::is_concurrency(&e) => {
                if self.product_repo.exists(id).await? {
                    error!("Concurrent update of product {}: {:#}", id, e);
                    Err(UseCaseError::Internal(e))
                } else {
                    warn!("Product {} disappeared during edit", id);
                    Err(UseCaseError::not_found("product", id))
                }
            }
            Err(e) => Err(UseCaseError::Internal(e)),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), UseCaseError> {
        match self.product_repo.delete(id).await {
            Ok(true) => {
                info!("Product {} deleted", id);
                Ok(())
            }
            Ok(false) => Err(UseCaseError::not_found("product", id)),
            Err(e) => {
                error!("Error deleting product {}: {:#}", id, e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }
}
