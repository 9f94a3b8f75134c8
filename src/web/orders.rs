//! Order pages, including the product lines shown on the details page

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

use crate::application::dto::{OrderForm, OrderLineForm};
use crate::application::{AppState, SAVE_FAILED_MESSAGE, UseCaseError};
use crate::domain::entities::{Order, OrderWithLines, ProductWithDetails};
use crate::domain::validation::{MODEL_LEVEL, ValidationErrors};
use crate::web::categories::DeleteQuery;
use crate::web::{WebError, delete_failed, layout, parse_id};

const INDEX: &str = "/Orders";
const DELETE_FAILED: &str = "Unable to delete order.";

fn save_failed() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.push(MODEL_LEVEL, SAVE_FAILED_MESSAGE);
    errors
}

fn form_page(title: &str, action: &str, submit: &str, form: &OrderForm, errors: &ValidationErrors) -> Html<String> {
    layout::render(
        title,
        html! {
            h1 { (title) }
            h4 { "Order" }
            hr;
            form method="post" action=(action) {
                (layout::validation_summary(errors))
                div class="form-group" {
                    label class="control-label" for="OrderDate" { "Order Date" }
                    input class="form-control" type="datetime-local" id="OrderDate" name="OrderDate"
                        value=(form.order_date.as_deref().unwrap_or_default());
                    (layout::field_errors(errors, "OrderDate"))
                }
                (layout::text_input("CustomerName", "Customer Name", form.customer_name.as_deref(), errors))
                (layout::text_input("CustomerEmail", "Customer Email", form.customer_email.as_deref(), errors))
                div class="form-group" {
                    input type="submit" value=(submit) class="btn btn-primary";
                }
            }
            (layout::back_to_list("Orders"))
        },
    )
}

fn rejected(err: UseCaseError, title: &str, action: &str, submit: &str, form: &OrderForm) -> Result<Response, WebError> {
    let errors = match err {
        UseCaseError::Validation(errors) => errors,
        UseCaseError::SaveFailed(_) => save_failed(),
        other => return Err(other.into()),
    };
    Ok(form_page(title, action, submit, form, &errors).into_response())
}

fn summary(order: &Order) -> Markup {
    html! {
        dl class="row" {
            dt { "Order Date" }
            dd { (order.order_date.format("%Y-%m-%d %H:%M")) }
            dt { "Customer Name" }
            dd { (order.customer_name) }
            dt { "Customer Email" }
            dd { (order.customer_email.as_deref().unwrap_or_default()) }
        }
    }
}

fn details_page(
    order: &OrderWithLines,
    products: &[ProductWithDetails],
    line: &OrderLineForm,
    errors: &ValidationErrors,
) -> Html<String> {
    let id = order.order.id;
    layout::render(
        "Details",
        html! {
            h1 { "Details" }
            h4 { "Order" }
            hr;
            (summary(&order.order))
            h4 { "Products" }
            table class="table" {
                thead {
                    tr { th { "Product" } th { "Price" } th { "Quantity" } th { "Total" } th {} }
                }
                tbody {
                    @for item in &order.lines {
                        tr {
                            td { (item.product_name) }
                            td { (layout::format_price(item.unit_price)) }
                            td { (item.quantity) }
                            td { (layout::format_price(item.line_total())) }
                            td {
                                form method="post" action={ "/Orders/RemoveProduct/" (id) "/" (item.product_id) } {
                                    input type="submit" value="Remove" class="btn btn-link";
                                }
                            }
                        }
                    }
                }
                tfoot {
                    tr { th colspan="3" { "Total" } th { (layout::format_price(order.total())) } th {} }
                }
            }
            form method="post" action={ "/Orders/AddProduct/" (id) } {
                (layout::validation_summary(errors))
                div class="form-group" {
                    label class="control-label" for="ProductId" { "Product" }
                    select class="form-control" id="ProductId" name="ProductId" {
                        @for item in products {
                            option value=(item.product.id)
                                selected[line.product_id.as_deref() == Some(item.product.id.to_string().as_str())] {
                                (item.product.name)
                            }
                        }
                    }
                    (layout::field_errors(errors, "ProductId"))
                }
                (layout::text_input("Quantity", "Quantity", line.quantity.as_deref(), errors))
                input type="submit" value="Add Product" class="btn btn-primary";
            }
            div {
                a href={ "/Orders/Edit/" (id) } { "Edit" } " | "
                a href="/Orders" { "Back to List" }
            }
        },
    )
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let orders = state.orders.list().await?;

    Ok(layout::render(
        "Orders",
        html! {
            h1 { "Orders" }
            p { a href="/Orders/Create" { "Create New" } }
            table class="table" {
                thead {
                    tr { th { "Order Date" } th { "Customer Name" } th { "Customer Email" } th { "Lines" } th { "Quantity" } th {} }
                }
                tbody {
                    @for item in &orders {
                        tr {
                            td { (item.order.order_date.format("%Y-%m-%d %H:%M")) }
                            td { (item.order.customer_name) }
                            td { (item.order.customer_email.as_deref().unwrap_or_default()) }
                            td class="line-count" { (item.line_count) }
                            td class="total-quantity" { (item.total_quantity) }
                            td {
                                a href={ "/Orders/Edit/" (item.order.id) } { "Edit" } " | "
                                a href={ "/Orders/Details/" (item.order.id) } { "Details" } " | "
                                a href={ "/Orders/Delete/" (item.order.id) } { "Delete" }
                            }
                        }
                    }
                }
            }
        },
    ))
}

pub async fn create_form() -> Html<String> {
    form_page("Create", "/Orders/Create", "Create", &OrderForm::default(), &ValidationErrors::new())
}

pub async fn create(State(state): State<AppState>, Form(form): Form<OrderForm>) -> Result<Response, WebError> {
    match state.orders.create(&form).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(e, "Create", "/Orders/Create", "Create", &form),
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let order = state.orders.details(id).await?;

    Ok(form_page(
        "Edit",
        &format!("/Orders/Edit/{id}"),
        "Save",
        &OrderForm::from(&order.order),
        &ValidationErrors::new(),
    ))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    match state.orders.update(id, &form).await {
        Ok(()) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(e, "Edit", &format!("/Orders/Edit/{id}"), "Save", &form),
    }
}

pub async fn details(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let order = state.orders.details(id).await?;
    let products = state.orders.products().await?;

    Ok(details_page(&order, &products, &OrderLineForm::default(), &ValidationErrors::new()))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let order = state.orders.details(id).await?;

    Ok(layout::render(
        "Delete",
        layout::delete_confirmation("Orders", id, query.error.as_deref(), summary(&order.order)),
    ))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect, WebError> {
    let id = parse_id(&id)?;
    match state.orders.delete(id).await {
        Ok(()) => Ok(Redirect::to(INDEX)),
        Err(UseCaseError::SaveFailed(_)) => delete_failed("Orders", id, DELETE_FAILED),
        Err(e) => Err(e.into()),
    }
}

/// Add a product line, or replace its quantity; redisplays the details page when invalid.
pub async fn add_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(line): Form<OrderLineForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    let errors = match state.orders.add_line(id, &line).await {
        Ok(()) => return Ok(Redirect::to(&format!("/Orders/Details/{id}")).into_response()),
        Err(UseCaseError::Validation(errors)) => errors,
        Err(UseCaseError::SaveFailed(_)) => save_failed(),
        Err(e) => return Err(e.into()),
    };

    let order = state.orders.details(id).await?;
    let products = state.orders.products().await?;
    Ok(details_page(&order, &products, &line, &errors).into_response())
}

pub async fn remove_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<Redirect, WebError> {
    let id = parse_id(&id)?;
    let product_id = parse_id(&product_id)?;
    state.orders.remove_line(id, product_id).await?;
    Ok(Redirect::to(&format!("/Orders/Details/{id}")))
}
