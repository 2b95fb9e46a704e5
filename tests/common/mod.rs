// Common test utilities and helper structs
// Shared across all test files to avoid duplication
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::util::ServiceExt;
use welcome_modal_backend::{
    app::{build_router, AppState},
    app_config::{
        AdmissionStrategy, AppConfig, DatabaseConfig, Environment, ServerConfig, ShopifyConfig,
    },
    models::{ModalSettings, NewModalSettings},
    services::{MemorySettingsStore, SettingsStore, StoreError},
    state_with_store,
    utils::signature::{compute_body_signature, SHOPIFY_HMAC_HEADER},
};

pub const TEST_SECRET: &str = "test-shared-secret";
pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_HOST: &str = "modal.example.com";

/// Configuration that never touches the environment
pub fn test_config(admission: AdmissionStrategy) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            port: 0,
            environment: Environment::Test,
        },
        shopify: ShopifyConfig {
            api_key: TEST_API_KEY.to_string(),
            api_secret: TEST_SECRET.to_string(),
            scopes: vec!["write_script_tags".to_string(), "read_themes".to_string()],
            host_name: TEST_HOST.to_string(),
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/welcome_modal_test".to_string(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: 5,
            idle_timeout: 60,
            max_lifetime: 120,
        },
        admission,
        cors_allowed_origins: vec!["*".to_string()],
        disable_embedded_migrations: true,
    }
}

/// base64 HMAC-SHA256 of `body` under the test secret
pub fn sign(body: &[u8]) -> String {
    compute_body_signature(TEST_SECRET, body)
}

/// A store whose backing database is always down
pub struct FailingStore;

#[async_trait]
impl SettingsStore for FailingStore {
    async fn find_by_shop(&self, _shop_domain: &str) -> Result<Option<ModalSettings>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn upsert(&self, _new_settings: NewModalSettings) -> Result<ModalSettings, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemorySettingsStore>,
}

impl TestApp {
    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: &'static str,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &'static str, uri: &str) -> Self {
        Self {
            app,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.raw_json(body_bytes)
    }

    /// Add an already encoded JSON body
    pub fn raw_json(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.header("content-type", "application/json")
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sign the current body with the shared secret
    pub fn signed(self) -> Self {
        let signature = sign(&self.body);
        self.header(SHOPIFY_HMAC_HEADER, &signature)
    }

    pub fn cookie(self, name: &str, value: &str) -> Self {
        self.header("cookie", &format!("{}={}", name, value))
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder.body(Body::from(self.body)).unwrap();

        let response = self.app.app.clone().oneshot(request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    pub fn location(&self) -> Option<String> {
        self.response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string())
    }

    /// Value of the cookie `name` from the `set-cookie` headers
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&prefix))
            .map(|value| {
                value[prefix.len()..]
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }

    /// Full `set-cookie` header for the cookie `name`
    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&prefix))
            .map(str::to_string)
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

/// Build the router around an explicit state
pub fn test_app_with_state(state: AppState, store: Arc<MemorySettingsStore>) -> TestApp {
    TestApp {
        app: build_router(state.clone()),
        state,
        store,
    }
}

/// Setup test application backed by the in-memory store
pub fn setup_test_app(admission: AdmissionStrategy) -> TestApp {
    let store = Arc::new(MemorySettingsStore::new());
    let state = state_with_store(test_config(admission), store.clone()).unwrap();
    test_app_with_state(state, store)
}

/// Setup test application whose store always fails
pub fn setup_failing_app() -> TestApp {
    let state = state_with_store(
        test_config(AdmissionStrategy::Signature),
        Arc::new(FailingStore),
    )
    .unwrap();
    test_app_with_state(state, Arc::new(MemorySettingsStore::new()))
}
