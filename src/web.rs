//! Web layer - HTTP routes and server-rendered pages
//!
//! Conventional resource routes (`/Products`, `/Products/Create`,
//! `/Products/Edit/{id}`, ...) over [`AppState`]. Pages are rendered with maud.

pub mod categories;
pub mod error;
pub mod home;
pub mod layout;
pub mod orders;
pub mod products;

use anyhow::Result;
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::AppState;
pub use error::WebError;

/// Parse an id path segment. Anything but an integer is treated as a missing record.
pub(crate) fn parse_id(raw: &str) -> Result<i64, WebError> {
    raw.trim().parse().map_err(|_| WebError::NotFound)
}

/// Back to the Delete page of `resource` with `message` in the `error` query.
pub(crate) fn delete_failed(resource: &str, id: i64, message: &str) -> Result<Redirect, WebError> {
    let query = serde_urlencoded::to_string([("error", message)])
        .map_err(|e| WebError::Internal(e.into()))?;
    Ok(Redirect::to(&format!("/{resource}/Delete/{id}?{query}")))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/Home", get(home::index))
        .route("/Categories", get(categories::index))
        .route("/Categories/Index", get(categories::index))
        .route("/Categories/Create", get(categories::create_form).post(categories::create))
        .route("/Categories/Edit/{id}", get(categories::edit_form).post(categories::edit))
        .route("/Categories/Details/{id}", get(categories::details))
        .route("/Categories/Delete/{id}", get(categories::delete_form).post(categories::delete))
        .route("/Products", get(products::index))
        .route("/Products/Index", get(products::index))
        .route("/Products/Create", get(products::create_form).post(products::create))
        .route("/Products/Edit/{id}", get(products::edit_form).post(products::edit))
        .route("/Products/Details/{id}", get(products::details))
        .route("/Products/Delete/{id}", get(products::delete_form).post(products::delete))
        .route("/Orders", get(orders::index))
        .route("/Orders/Index", get(orders::index))
        .route("/Orders/Create", get(orders::create_form).post(orders::create))
        .route("/Orders/Edit/{id}", get(orders::edit_form).post(orders::edit))
        .route("/Orders/Details/{id}", get(orders::details))
        .route("/Orders/Delete/{id}", get(orders::delete_form).post(orders::delete))
        .route("/Orders/AddProduct/{id}", post(orders::add_product))
        .route("/Orders/RemoveProduct/{id}/{product_id}", post(orders::remove_product))
        .fallback(error::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Bind `address` and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, address: &str) -> Result<()> {
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
