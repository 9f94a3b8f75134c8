use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use thiserror::Error;
use tracing::error;

use crate::application::UseCaseError;
use crate::web::layout;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<UseCaseError> for WebError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::NotFound { .. } => Self::NotFound,
            UseCaseError::SaveFailed(e) | UseCaseError::Internal(e) => Self::Internal(e),
            other @ (UseCaseError::Validation(_) | UseCaseError::CapacityReached { .. }) => {
                Self::Internal(anyhow::anyhow!("unhandled use case outcome: {other}"))
            }
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested record does not exist.",
            ),
            Self::Internal(e) => {
                error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error",
                    "An error occurred while processing your request.",
                )
            }
        };

        let page = layout::page(
            title,
            html! {
                h1 class="text-danger" { (title) }
                p { (message) }
                a href="/" { "Home" }
            },
        );
        (status, Html(page.into_string())).into_response()
    }
}

pub async fn not_found() -> WebError {
    WebError::NotFound
}
