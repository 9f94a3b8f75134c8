//! Shared page chrome and form helpers

use axum::response::Html;
use maud::{DOCTYPE, Markup, html};

use crate::domain::validation::ValidationErrors;

pub const APP_TITLE: &str = "Online Store Admin";

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (APP_TITLE) }
            }
            body {
                header {
                    nav {
                        a class="navbar-brand" href="/" { (APP_TITLE) }
                        ul class="navbar-nav" {
                            li { a class="nav-link" href="/Categories" { "Categories" } }
                            li { a class="nav-link" href="/Products" { "Products" } }
                            li { a class="nav-link" href="/Orders" { "Orders" } }
                        }
                    }
                }
                main class="container" role="main" {
                    (body)
                }
            }
        }
    }
}

pub fn render(title: &str, body: Markup) -> Html<String> {
    Html(page(title, body).into_string())
}

/// Inline messages for one field.
pub fn field_errors(errors: &ValidationErrors, field: &str) -> Markup {
    html! {
        @for message in errors.for_field(field) {
            span class="text-danger field-validation-error" data-valmsg-for=(field) { (message) }
        }
    }
}

/// Model-level messages, shown above the form fields.
pub fn validation_summary(errors: &ValidationErrors) -> Markup {
    let messages: Vec<&str> = errors.model_level().collect();
    html! {
        @if !messages.is_empty() {
            div class="text-danger validation-summary-errors" {
                ul {
                    @for message in &messages {
                        li { (message) }
                    }
                }
            }
        }
    }
}

pub fn text_input(name: &str, label: &str, value: Option<&str>, errors: &ValidationErrors) -> Markup {
    html! {
        div class="form-group" {
            label class="control-label" for=(name) { (label) }
            input class="form-control" type="text" id=(name) name=(name) value=(value.unwrap_or_default());
            (field_errors(errors, name))
        }
    }
}

pub fn text_area(name: &str, label: &str, value: Option<&str>, errors: &ValidationErrors) -> Markup {
    html! {
        div class="form-group" {
            label class="control-label" for=(name) { (label) }
            textarea class="form-control" id=(name) name=(name) { (value.unwrap_or_default()) }
            (field_errors(errors, name))
        }
    }
}

pub fn hidden(name: &str, value: Option<&str>) -> Markup {
    html! {
        input type="hidden" id=(name) name=(name) value=(value.unwrap_or_default());
    }
}

pub fn back_to_list(resource: &str) -> Markup {
    html! {
        div { a href={ "/" (resource) } { "Back to List" } }
    }
}

/// Confirmation form used by the Delete pages.
pub fn delete_confirmation(resource: &str, id: i64, error: Option<&str>, summary: Markup) -> Markup {
    html! {
        h1 { "Delete" }
        @if let Some(error) = error {
            p class="text-danger" { (error) }
        }
        h3 { "Are you sure you want to delete this?" }
        (summary)
        form method="post" action={ "/" (resource) "/Delete/" (id) } {
            input type="submit" value="Delete" class="btn btn-danger";
            " | "
            a href={ "/" (resource) } { "Back to List" }
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_menu_links() {
        let html = page("Home", html! { p { "hi" } }).into_string();

        assert!(html.contains("href=\"/Categories\""));
        assert!(html.contains("href=\"/Products\""));
        assert!(html.contains("href=\"/Orders\""));
    }

    #[test]
    fn test_summary_only_shows_model_level_errors() {
        let mut errors = ValidationErrors::new();
        errors.push("Name", "The Name field is required.");
        errors.push("", "Unable to save changes.");

        let html = validation_summary(&errors).into_string();

        assert!(html.contains("Unable to save changes."));
        assert!(!html.contains("The Name field is required."));
    }

    #[test]
    fn test_field_errors_are_escaped() {
        let mut errors = ValidationErrors::new();
        errors.push("Price", "The value '<b>' is not valid for Price.");

        let html = field_errors(&errors, "Price").into_string();

        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12.0), "12.00");
    }
}
