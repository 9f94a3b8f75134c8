//! Product pages
//!
//! The create and edit forms post the product fields together with the
//! `ProductDetail.*` fields so both records are saved in one step.

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

use crate::application::dto::ProductForm;
use crate::application::{AppState, SAVE_FAILED_MESSAGE, UseCaseError};
use crate::domain::entities::{Category, ProductWithDetails};
use crate::domain::validation::{MODEL_LEVEL, ValidationErrors};
use crate::web::categories::DeleteQuery;
use crate::web::{WebError, delete_failed, layout, parse_id};

const INDEX: &str = "/Products";
const DELETE_FAILED: &str = "Unable to delete product.";

enum Mode {
    Create,
    Edit(i64),
}

impl Mode {
    const fn title(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Edit(_) => "Edit",
        }
    }

    const fn submit(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Edit(_) => "Save",
        }
    }

    fn action(&self) -> String {
        match self {
            Self::Create => "/Products/Create".to_string(),
            Self::Edit(id) => format!("/Products/Edit/{id}"),
        }
    }
}

fn category_select(categories: &[Category], selected: Option<i64>, errors: &ValidationErrors) -> Markup {
    html! {
        div class="form-group" {
            label class="control-label" for="CategoryId" { "Category" }
            select class="form-control" id="CategoryId" name="CategoryId" {
                @for category in categories {
                    option value=(category.id) selected[selected == Some(category.id)] { (category.name) }
                }
            }
            (layout::field_errors(errors, "CategoryId"))
        }
    }
}

fn form_page(mode: &Mode, form: &ProductForm, categories: &[Category], errors: &ValidationErrors) -> Html<String> {
    layout::render(
        mode.title(),
        html! {
            h1 { (mode.title()) }
            h4 { "Product" }
            hr;
            form method="post" action=(mode.action()) {
                (layout::validation_summary(errors))
                @if let Mode::Edit(_) = mode {
                    (layout::hidden("ProductId", form.product_id.as_deref()))
                    (layout::hidden("ProductDetail.ProductDetailId", form.detail_id.as_deref()))
                }
                (layout::text_input("Name", "Name", form.name.as_deref(), errors))
                (layout::text_input("Price", "Price", form.price.as_deref(), errors))
                (category_select(categories, form.selected_category(), errors))
                (layout::field_errors(errors, "ProductDetail"))
                (layout::text_area("ProductDetail.Description", "Description", form.description.as_deref(), errors))
                (layout::text_area("ProductDetail.Specifications", "Specifications", form.specifications.as_deref(), errors))
                div class="form-group" {
                    input type="submit" value=(mode.submit()) class="btn btn-primary";
                }
            }
            (layout::back_to_list("Products"))
        },
    )
}

fn summary(product: &ProductWithDetails) -> Markup {
    let detail = product.details.as_ref();
    html! {
        dl class="row" {
            dt { "Name" }
            dd { (product.product.name) }
            dt { "Price" }
            dd { (layout::format_price(product.product.price)) }
            dt { "Category" }
            dd { (product.category_name.as_deref().unwrap_or_default()) }
            dt { "Description" }
            dd { (detail.and_then(|d| d.description.as_deref()).unwrap_or_default()) }
            dt { "Specifications" }
            dd { (detail.and_then(|d| d.specifications.as_deref()).unwrap_or_default()) }
        }
    }
}

/// Re-render the form for validation and save failures; other outcomes leave the page.
async fn rejected(state: &AppState, err: UseCaseError, mode: &Mode, form: &ProductForm) -> Result<Response, WebError> {
    let errors = match err {
        UseCaseError::Validation(errors) => errors,
        UseCaseError::SaveFailed(_) => {
            let mut errors = ValidationErrors::new();
            errors.push(MODEL_LEVEL, SAVE_FAILED_MESSAGE);
            errors
        }
        UseCaseError::CapacityReached { .. } => return Ok(Redirect::to(INDEX).into_response()),
        other => return Err(other.into()),
    };

    let categories = state.products.categories().await?;
    Ok(form_page(mode, form, &categories, &errors).into_response())
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let products = state.products.list().await?;

    Ok(layout::render(
        "Products",
        html! {
            h1 { "Products" }
            p { a href="/Products/Create" { "Create New" } }
            table class="table" {
                thead {
                    tr { th { "Name" } th { "Price" } th { "Category" } th {} }
                }
                tbody {
                    @for item in &products {
                        tr {
                            td { (item.product.name) }
                            td { (layout::format_price(item.product.price)) }
                            td { (item.category_name.as_deref().unwrap_or_default()) }
                            td {
                                a href={ "/Products/Edit/" (item.product.id) } { "Edit" } " | "
                                a href={ "/Products/Details/" (item.product.id) } { "Details" } " | "
                                a href={ "/Products/Delete/" (item.product.id) } { "Delete" }
                            }
                        }
                    }
                }
            }
        },
    ))
}

pub async fn create_form(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let categories = state.products.categories().await?;
    Ok(form_page(&Mode::Create, &ProductForm::default(), &categories, &ValidationErrors::new()))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Result<Response, WebError> {
    match state.products.create(&form).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(&state, e, &Mode::Create, &form).await,
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let product = state.products.edit_form(id).await?;
    let categories = state.products.categories().await?;

    Ok(form_page(
        &Mode::Edit(id),
        &ProductForm::from(&product),
        &categories,
        &ValidationErrors::new(),
    ))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    match state.products.update(id, &form).await {
        Ok(()) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(&state, e, &Mode::Edit(id), &form).await,
    }
}

pub async fn details(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let product = state.products.details(id).await?;

    Ok(layout::render(
        "Details",
        html! {
            h1 { "Details" }
            h4 { "Product" }
            hr;
            (summary(&product))
            div {
                a href={ "/Products/Edit/" (id) } { "Edit" } " | "
                a href="/Products" { "Back to List" }
            }
        },
    ))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let product = state.products.details(id).await?;

    Ok(layout::render(
        "Delete",
        layout::delete_confirmation("Products", id, query.error.as_deref(), summary(&product)),
    ))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect, WebError> {
    let id = parse_id(&id)?;
    match state.products.delete(id).await {
        Ok(()) => Ok(Redirect::to(INDEX)),
        Err(UseCaseError::SaveFailed(_)) => delete_failed("Products", id, DELETE_FAILED),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::infrastructure::AppConfig;
    use crate::test_utils::{FailingProductRepository, TestContext, product_form};
    use crate::web::router;

    use super::*;

    /// Router whose product writes all fail, seeded with one product.
    async fn failing_writes_app() -> Result<(TestContext, Router)> {
        let ctx = TestContext::new().await?;
        let category_id = ctx.seed_category("Sosy").await?;
        ctx.product_use_cases.create(&product_form("Keczup", "12", category_id)).await?;

        let state = AppState::with_repositories(
            ctx.category_repo.clone(),
            Arc::new(FailingProductRepository::new(ctx.product_repo.clone())),
            ctx.order_repo.clone(),
            &AppConfig::default(),
        );
        Ok((ctx, router(state)))
    }

    fn form_post(uri: &str, body: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))?)
    }

    #[tokio::test]
    async fn failed_delete_redirects_back_with_error() -> Result<()> {
        let (ctx, app) = failing_writes_app().await?;

        let response = app.clone().oneshot(form_post("/Products/Delete/1", "")?).await?;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok());
        assert_eq!(location, Some("/Products/Delete/1?error=Unable+to+delete+product."));

        let confirm = Request::builder()
            .uri("/Products/Delete/1?error=Unable+to+delete+product.")
            .body(Body::empty())?;
        let page = app.oneshot(confirm).await?;
        let bytes = axum::body::to_bytes(page.into_body(), usize::MAX).await?;
        assert!(String::from_utf8_lossy(&bytes).contains(DELETE_FAILED));

        assert!(ctx.product_use_cases.details(1).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn failed_create_shows_save_message() -> Result<()> {
        let (ctx, app) = failing_writes_app().await?;

        let response = app
            .oneshot(form_post(
                "/Products/Create",
                "Name=Musztarda&Price=8&CategoryId=1&ProductDetail.Description=Sarepska",
            )?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert!(String::from_utf8_lossy(&bytes).contains("Unable to save changes. Try again"));
        assert_eq!(ctx.product_use_cases.list().await?.len(), 1);
        Ok(())
    }
}
