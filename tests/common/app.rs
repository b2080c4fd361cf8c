//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use duotone::models::AppConfig;
use duotone::server::{build_router, create_app_state, AppState};
use duotone::services::{InMemorySessionStore, SessionStore};

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    /// Create a new test application with a short debounce
    pub fn new() -> Self {
        Self::with_config(Self::test_config())
    }

    /// Defaults, but with timings short enough for tests
    pub fn test_config() -> AppConfig {
        AppConfig {
            debounce_ms: 50,
            result_wait_ms: 5000,
            ..AppConfig::default()
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        // Create application state using shared server module
        let state = create_app_state(config);

        // Keep references for test assertions
        let sessions = state.sessions.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self { router, sessions }
    }

    /// Create a test app and return the state for custom router configuration
    pub fn create_state() -> AppState {
        create_app_state(Self::test_config())
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a POST request with a raw body
    pub async fn post_bytes(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        self.send_bytes(Request::post(path), headers, body).await
    }

    /// Make a PUT request with a raw body
    pub async fn put_bytes(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        self.send_bytes(Request::put(path), headers, body).await
    }

    /// Make a PUT request with JSON body
    pub async fn put_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    async fn send_bytes(
        &self,
        mut builder: axum::http::request::Builder,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload a PNG and return the new session's id
    pub async fn create_session(&self, png: Vec<u8>) -> String {
        let response = self
            .post_bytes(
                "/api/sessions",
                &[("Content-Type", "image/png"), ("X-Filename", "photo.png")],
                png,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "create failed: {}",
            response.text()
        );

        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.len().await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body to RGBA
    pub fn rgba(&self) -> image::RgbaImage {
        image::load_from_memory_with_format(&self.body, image::ImageFormat::Png)
            .expect("Response is not a decodable PNG")
            .into_rgba8()
    }
}
