//! Shared helpers for the HTTP integration tests.
//!
//! The app is built with [`build_app_router`], exactly like `main.rs`, over
//! an in-memory store seeded from `tests/fixtures/content.json`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use atrium_api::config::ServerConfig;
use atrium_api::router::build_app_router;
use atrium_api::state::AppState;
use atrium_core::config::SiteConfig;
use atrium_core::content::{Page, Post};
use atrium_db::{ContentStore, MemoryContentStore, PageQuery, PostQuery, StoreError};
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const SEED: &str = include_str!("../fixtures/content.json");
pub const PREVIEW_TOKEN: &str = "let-me-see";
pub const REVALIDATE_SECRET: &str = "s3cret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        fetch_timeout_ms: 1_000,
        render_cache_capacity: 64,
        preview_token: Some(PREVIEW_TOKEN.to_string()),
        revalidate_secret: Some(REVALIDATE_SECRET.to_string()),
        site_config_path: None,
        database_url: None,
        content_seed_path: None,
    }
}

/// Memory store that counts the queries reaching it.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryContentStore,
    pub page_queries: AtomicUsize,
    pub post_queries: AtomicUsize,
}

impl CountingStore {
    pub fn seeded() -> Self {
        Self {
            inner: MemoryContentStore::from_seed_str(SEED).expect("fixture must parse"),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> usize {
        self.page_queries.load(Ordering::SeqCst) + self.post_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn find_pages(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError> {
        self.page_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_pages(query).await
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        self.post_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_posts(query).await
    }

    async fn find_page_by_id(&self, id: &str) -> Result<Option<Page>, StoreError> {
        self.page_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_page_by_id(id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<CountingStore>,
}

/// Build the full application over the seeded fixture.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(CountingStore::seeded());
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn ContentStore>,
        SiteConfig::default(),
        config.clone(),
    );
    let router = build_app_router(state.clone(), &config);
    TestApp {
        router,
        state,
        store,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_header(
    app: &TestApp,
    uri: &str,
    name: &str,
    value: &str,
) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a JSON body, with the revalidate secret when `secret` is given.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    secret: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-revalidate-secret", secret);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
