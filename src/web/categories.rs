//! Category pages

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::application::dto::CategoryForm;
use crate::application::{AppState, SAVE_FAILED_MESSAGE, UseCaseError};
use crate::domain::entities::Category;
use crate::domain::validation::{MODEL_LEVEL, ValidationErrors};
use crate::web::{WebError, delete_failed, layout, parse_id};

const INDEX: &str = "/Categories";
const DELETE_FAILED: &str = "Unable to delete category.";

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub error: Option<String>,
}

fn form_page(title: &str, action: &str, submit: &str, form: &CategoryForm, errors: &ValidationErrors) -> Html<String> {
    layout::render(
        title,
        html! {
            h1 { (title) }
            h4 { "Category" }
            hr;
            form method="post" action=(action) {
                (layout::validation_summary(errors))
                (layout::text_input("Name", "Name", form.name.as_deref(), errors))
                div class="form-group" {
                    input type="submit" value=(submit) class="btn btn-primary";
                }
            }
            (layout::back_to_list("Categories"))
        },
    )
}

fn summary(category: &Category) -> Markup {
    html! {
        dl class="row" {
            dt { "Name" }
            dd { (category.name) }
        }
    }
}

/// Re-render on validation failure; anything else becomes an error page.
fn rejected(
    err: UseCaseError,
    title: &str,
    action: &str,
    submit: &str,
    form: &CategoryForm,
) -> Result<Response, WebError> {
    let errors = match err {
        UseCaseError::Validation(errors) => errors,
        UseCaseError::SaveFailed(_) => {
            let mut errors = ValidationErrors::new();
            errors.push(MODEL_LEVEL, SAVE_FAILED_MESSAGE);
            errors
        }
        other => return Err(other.into()),
    };
    Ok(form_page(title, action, submit, form, &errors).into_response())
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let categories = state.categories.list().await?;

    Ok(layout::render(
        "Categories",
        html! {
            h1 { "Categories" }
            p { a href="/Categories/Create" { "Create New" } }
            table class="table" {
                thead { tr { th { "Name" } th {} } }
                tbody {
                    @for category in &categories {
                        tr {
                            td { (category.name) }
                            td {
                                a href={ "/Categories/Edit/" (category.id) } { "Edit" } " | "
                                a href={ "/Categories/Details/" (category.id) } { "Details" } " | "
                                a href={ "/Categories/Delete/" (category.id) } { "Delete" }
                            }
                        }
                    }
                }
            }
        },
    ))
}

pub async fn create_form() -> Html<String> {
    form_page("Create", "/Categories/Create", "Create", &CategoryForm::default(), &ValidationErrors::new())
}

pub async fn create(State(state): State<AppState>, Form(form): Form<CategoryForm>) -> Result<Response, WebError> {
    match state.categories.create(&form).await {
        Ok(_) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(e, "Create", "/Categories/Create", "Create", &form),
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let category = state.categories.details(id).await?;

    Ok(form_page(
        "Edit",
        &format!("/Categories/Edit/{id}"),
        "Save",
        &CategoryForm::from(&category),
        &ValidationErrors::new(),
    ))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, WebError> {
    let id = parse_id(&id)?;
    match state.categories.update(id, &form).await {
        Ok(()) => Ok(Redirect::to(INDEX).into_response()),
        Err(e) => rejected(e, "Edit", &format!("/Categories/Edit/{id}"), "Save", &form),
    }
}

pub async fn details(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, WebError> {
    let id = parse_id(&id)?;
    let category = state.categories.details(id).await?;

    Ok(layout::render(
        "Details",
        html! {
            h1 { "Details" }
            h4 { "Category" }
            hr;
            (summary(&category))
            div {
                a href={ "/Categories/Edit/" (category.id) } { "Edit" } " | "
                a href="/Categories" { "Back to List" }
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
    let category = state.categories.details(id).await?;

    Ok(layout::render(
        "Delete",
        layout::delete_confirmation("Categories", id, query.error.as_deref(), summary(&category)),
    ))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect, WebError> {
    let id = parse_id(&id)?;
    match state.categories.delete(id).await {
        Ok(()) => Ok(Redirect::to(INDEX)),
        Err(UseCaseError::SaveFailed(_)) => delete_failed("Categories", id, DELETE_FAILED),
        Err(e) => Err(e.into()),
    }
}
