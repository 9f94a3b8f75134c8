//! Home menu and category pages driven through the router

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{TestApp, is_redirect_to};

#[tokio::test]
async fn test_home_page_has_menu() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.get("/").await?;

    assert_eq!(response.status, StatusCode::OK);
    for target in ["/Categories", "/Products", "/Orders"] {
        assert!(response.body.contains(&format!("href=\"{target}\"")), "{target}");
    }
    Ok(())
}

#[tokio::test]
async fn test_index_pages_offer_create_new() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in ["/Categories", "/Products", "/Orders"] {
        let response = app.get(uri).await?;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("Create New"), "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_category_name_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.post("/Categories/Create", "Name=").await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("The Name field is required."));
    Ok(())
}

#[tokio::test]
async fn test_category_lifecycle() -> Result<()> {
    let app = TestApp::new().await?;

    let created = app.post("/Categories/Create", "Name=Sosy").await?;
    assert!(is_redirect_to(&created, "/Categories"));

    let edited = app.post("/Categories/Edit/1", "Name=Przyprawy").await?;
    assert!(is_redirect_to(&edited, "/Categories"));
    let details = app.get("/Categories/Details/1").await?;
    assert!(details.body.contains("Przyprawy"));

    let deleted = app.post("/Categories/Delete/1", "").await?;
    assert!(is_redirect_to(&deleted, "/Categories"));
    assert_eq!(app.get("/Categories/Details/1").await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_edit_of_missing_category_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.post("/Categories/Edit/5", "Name=Sosy").await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_deleting_category_removes_its_products() -> Result<()> {
    let app = TestApp::new().await?;
    let category_id = app.create_category("Sosy").await?;
    app.create_product("Keczup", "12", category_id).await?;

    app.post(&format!("/Categories/Delete/{category_id}"), "").await?;

    assert!(!app.get("/Products").await?.body.contains("Keczup"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    assert_eq!(app.get("/Suppliers").await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_form_field_is_unprocessable() -> Result<()> {
    let app = TestApp::new().await?;

    let response = app.post("/Categories/Create", "Name=Sosy&Name=Napoje").await?;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!app.get("/Categories").await?.body.contains("/Categories/Details/"));
    Ok(())
}
