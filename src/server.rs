//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::{header::X_CONTENT_TYPE_OPTIONS, HeaderMap, HeaderValue, StatusCode},
    response::{Json, Response},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{InMemorySessionStore, ProcessingService, SessionInfo};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub processor: Arc<ProcessingService>,
    pub sessions: Arc<InMemorySessionStore>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    let config = Arc::new(config);
    let processor = Arc::new(ProcessingService::new(config.clone()));
    let sessions = Arc::new(InMemorySessionStore::new(config.max_sessions));

    AppState {
        config,
        processor,
        sessions,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Request
/// bodies are capped at the configured upload limit; anything larger is
/// rejected with 413 before it is buffered.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/duotone", post(handle_convert))
        .route("/api/sessions", post(handle_create_session))
        .route(
            "/api/sessions/:id",
            get(handle_get_session).delete(handle_delete_session),
        )
        .route("/api/sessions/:id/orientation", put(handle_set_orientation))
        .route("/api/sessions/:id/source", put(handle_replace_source))
        .route("/api/sessions/:id/image", get(handle_session_image))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(body_limit))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_convert(
    State(state): State<AppState>,
    query: Query<api::ConvertQuery>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = api::read_body(body, &headers, state.config.max_upload_bytes)?;
    api::handle_convert(State(state.processor), query, headers, body).await
}

async fn handle_create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = api::read_body(body, &headers, state.config.max_upload_bytes)?;
    api::handle_create_session(
        State(state.sessions),
        State(state.processor),
        State(state.config),
        headers,
        body,
    )
    .await
}

async fn handle_get_session(
    State(state): State<AppState>,
    path: Path<String>,
) -> Result<Json<SessionInfo>, ApiError> {
    api::handle_get_session(State(state.sessions), path).await
}

async fn handle_set_orientation(
    State(state): State<AppState>,
    path: Path<String>,
    body: Result<Json<api::OrientationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    api::handle_set_orientation(State(state.sessions), path, body).await
}

async fn handle_replace_source(
    State(state): State<AppState>,
    path: Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = api::read_body(body, &headers, state.config.max_upload_bytes)?;
    api::handle_replace_source(State(state.sessions), path, headers, body).await
}

async fn handle_session_image(
    State(state): State<AppState>,
    path: Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    api::handle_session_image(State(state.sessions), State(state.config), path, headers).await
}

async fn handle_delete_session(
    State(state): State<AppState>,
    path: Path<String>,
) -> Result<StatusCode, ApiError> {
    api::handle_delete_session(State(state.sessions), path).await
}
