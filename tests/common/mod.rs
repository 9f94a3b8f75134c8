//! Shared helpers for the router tests
#![allow(dead_code)]

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use online_store_admin::application::AppState;
use online_store_admin::infrastructure::{AppConfig, DatabaseConnection};
use online_store_admin::web;

pub struct TestApp {
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_max_products(AppConfig::default().store.max_products).await
    }

    pub async fn with_max_products(max_products: u32) -> Result<Self> {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.store.max_products = max_products;

        let db = DatabaseConnection::from_config(&config.database).await?;
        db.migrate().await?;
        let state = AppState::new(db.pool().clone(), &config);

        Ok(Self { router: web::router(state) })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        self.send(request).await
    }

    /// POST an already url-encoded form body.
    pub async fn post(&self, uri: &str, form: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Create a category through the form and return its id (ids start at 1).
    pub async fn create_category(&self, name: &str) -> Result<i64> {
        let response = self.post("/Categories/Create", &format!("Name={name}")).await?;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let index = self.get("/Categories").await?;
        Ok(index.body.matches("/Categories/Details/").count() as i64)
    }

    pub async fn create_product(&self, name: &str, price: &str, category_id: i64) -> Result<TestResponse> {
        self.post("/Products/Create", &product_body(name, price, category_id)).await
    }
}

pub fn product_body(name: &str, price: &str, category_id: i64) -> String {
    format!(
        "Name={name}&Price={price}&CategoryId={category_id}\
         &ProductDetail.Description=Pyszny+keczup+Pudliszki\
         &ProductDetail.Specifications=W+99%25+z+pomidorow"
    )
}

pub fn is_redirect_to(response: &TestResponse, target: &str) -> bool {
    response.status == StatusCode::SEE_OTHER && response.location.as_deref() == Some(target)
}
