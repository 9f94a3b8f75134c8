//! Application use cases for orders and their product lines

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::dto::{OrderForm, OrderLineForm};
use crate::application::use_cases::UseCaseError;
use crate::domain::entities::{
    OrderDraft, OrderProduct, OrderSummary, OrderWithLines, ProductWithDetails,
};
use crate::domain::repositories::{OrderRepository, ProductRepository, RepositoryError};
use crate::domain::validation::{validate_order, validate_product_reference, validate_quantity};

pub struct OrderUseCases {
    order_repo: Arc<dyn OrderRepository>,
    product_repo: Arc<dyn ProductRepository>,
}

impl OrderUseCases {
    pub fn new(order_repo: Arc<dyn OrderRepository>, product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { order_repo, product_repo }
    }

    pub async fn list(&self) -> Result<Vec<OrderSummary>, UseCaseError> {
        Ok(self.order_repo.find_all().await?)
    }

    /// Products offered when adding a line to an order.
    pub async fn products(&self) -> Result<Vec<ProductWithDetails>, UseCaseError> {
        Ok(self.product_repo.find_all().await?)
    }

    pub async fn details(&self, id: i64) -> Result<OrderWithLines, UseCaseError> {
        self.order_repo
            .find_with_lines(id)
            .await?
            .ok_or(UseCaseError::NotFound { entity: "order", id })
    }

    fn check(form: &OrderForm) -> Result<OrderDraft, UseCaseError> {
        let (draft, mut errors) = form.bind();
        validate_order(&mut errors, &draft);
        if errors.is_empty() {
            Ok(draft)
        } else {
            info!("Order form is invalid ({} errors)", errors.len());
            Err(UseCaseError::Validation(errors))
        }
    }

    pub async fn create(&self, form: &OrderForm) -> Result<i64, UseCaseError> {
        let draft = Self::check(form)?;

        match self.order_repo.create(&draft).await {
            Ok(id) => {
                info!("Order {} created for {}", id, draft.customer_name);
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create order: {:#}", e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }

    pub async fn update(&self, id: i64, form: &OrderForm) -> Result<(), UseCaseError> {
        let draft = Self::check(form)?;

        match self.order_repo.update(id, &draft).await {
            Ok(()) => {
                info!("Order {} updated", id);
                Ok(())
            }
            Err(e) if RepositoryError::is_concurrency(&e) => {
                if self.order_repo.exists(id).await? {
                    Err(UseCaseError::Internal(e))
                } else {
                    warn!("Order {} disappeared during edit", id);
                    Err(UseCaseError::NotFound { entity: "order", id })
                }
            }
            Err(e) => Err(UseCaseError::Internal(e)),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), UseCaseError> {
        match self.order_repo.delete(id).await {
            Ok(true) => {
                info!("Order {} deleted", id);
                Ok(())
            }
            Ok(false) => Err(UseCaseError::NotFound { entity: "order", id }),
            Err(e) => {
                error!("Error deleting order {}: {:#}", id, e);
                Err(UseCaseError::SaveFailed(e))
            }
        }
    }

    /// Adds a product to an order, replacing the quantity when the product is already on it.
    pub async fn add_line(&self, order_id: i64, form: &OrderLineForm) -> Result<(), UseCaseError> {
        if !self.order_repo.exists(order_id).await? {
            return Err(UseCaseError::NotFound { entity: "order", id: order_id });
        }

        let (input, mut errors) = form.bind();
        let product_exists =
            input.product_id > 0 && self.product_repo.exists(input.product_id).await?;
        validate_product_reference(&mut errors, input.product_id, product_exists);
        validate_quantity(&mut errors, input.quantity);
        if !errors.is_empty() {
            info!("Order line for order {} is invalid", order_id);
            return Err(UseCaseError::Validation(errors));
        }

        let line = OrderProduct {
            order_id,
            product_id: input.product_id,
            quantity: input.quantity,
        };
        self.order_repo.upsert_line(&line).await.map_err(|e| {
            error!("Failed to save order line {:?}: {:#}", line, e);
            UseCaseError::SaveFailed(e)
        })?;
        info!("Order {} now holds {} x product {}", order_id, line.quantity, line.product_id);
        Ok(())
    }

    pub async fn remove_line(&self, order_id: i64, product_id: i64) -> Result<(), UseCaseError> {
        if self.order_repo.remove_line(order_id, product_id).await? {
            info!("Product {} removed from order {}", product_id, order_id);
            Ok(())
        } else {
            Err(UseCaseError::NotFound { entity: "order line", id: product_id })
        }
    }
}
