use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::convert::png_response;
use crate::api::headers::{read_json, upload_from_request, HeaderMapExt};
use crate::error::ApiError;
use crate::models::{AppConfig, SessionId};
use crate::services::{ProcessingService, Session, SessionInfo, SessionOutput, SessionStore};

/// Requested orientation for a session
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrientationRequest {
    /// `true` maps dark tones to the highlight color
    pub reversed: bool,
}

/// Acknowledgement of an accepted change
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangeAccepted {
    /// Generation that will carry the change
    pub generation: u64,
    pub reversed: bool,
}

async fn find_session<S: SessionStore>(store: &S, id: &str) -> Result<Arc<Session>, ApiError> {
    store
        .get(&SessionId::new(id))
        .await
        .ok_or(ApiError::SessionNotFound)
}

/// Create a processing session
///
/// Validates the uploaded photo, processes it in normal orientation and
/// returns the session once the first rendition is ready.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body(content = Vec<u8>, description = "Image bytes", content_type = "application/octet-stream"),
    params(
        ("X-Filename" = Option<String>, Header, description = "Original file name"),
    ),
    responses(
        (status = 201, description = "Session created", body = SessionInfo),
        (status = 400, description = "Empty upload"),
        (status = 413, description = "Upload too large"),
        (status = 415, description = "Not a JPEG, PNG or WebP image"),
        (status = 422, description = "Image could not be decoded"),
    ),
    tag = "Sessions"
)]
pub async fn handle_create_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(processor): State<Arc<ProcessingService>>,
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let upload = upload_from_request(&headers, body);
    processor.validate(&upload)?;

    let session = Session::new(
        SessionId::generate(),
        upload,
        processor.clone(),
        config.debounce(),
    );
    session.start();
    store.insert(session.clone()).await;

    tracing::info!(session = %session.id(), "Session created");

    if let Some(SessionOutput::Failed(failure)) = session.wait_current(config.result_wait()).await {
        store.remove(session.id()).await;
        return Err(ApiError::RunFailed(failure));
    }

    Ok((StatusCode::CREATED, Json(session.info().await)).into_response())
}

/// Get session status
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session info", body = SessionInfo),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn handle_get_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>, ApiError> {
    let session = find_session(store.as_ref(), &id).await?;
    Ok(Json(session.info().await))
}

/// Change orientation
///
/// Accepted immediately; processing starts after the debounce period, so
/// rapid toggles collapse into one run.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/orientation",
    params(("id" = String, Path, description = "Session ID")),
    request_body = OrientationRequest,
    responses(
        (status = 202, description = "Change accepted", body = ChangeAccepted),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn handle_set_orientation<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    body: Result<Json<OrientationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let session = find_session(store.as_ref(), &id).await?;
    let request = read_json(body)?;
    let generation = session.set_orientation(request.reversed).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(ChangeAccepted {
            generation,
            reversed: request.reversed,
        }),
    )
        .into_response())
}

/// Replace the session's photo
///
/// Orientation resets to normal. A rejected upload leaves the session as it was.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/source",
    request_body(content = Vec<u8>, description = "Image bytes", content_type = "application/octet-stream"),
    params(
        ("id" = String, Path, description = "Session ID"),
        ("X-Filename" = Option<String>, Header, description = "Original file name"),
    ),
    responses(
        (status = 202, description = "Replacement accepted", body = ChangeAccepted),
        (status = 404, description = "Session not found"),
        (status = 413, description = "Upload too large"),
        (status = 415, description = "Not a JPEG, PNG or WebP image"),
    ),
    tag = "Sessions"
)]
pub async fn handle_replace_source<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let session = find_session(store.as_ref(), &id).await?;
    let upload = upload_from_request(&headers, body);
    let generation = session.replace_source(upload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ChangeAccepted {
            generation,
            reversed: false,
        }),
    )
        .into_response())
}

/// Download the current rendition
///
/// Waits briefly for an in-flight run. Results of superseded requests are
/// never returned.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/image",
    params(
        ("id" = String, Path, description = "Session ID"),
        ("If-None-Match" = Option<String>, Header, description = "ETag of a cached copy"),
    ),
    responses(
        (status = 200, description = "Duotone PNG", content_type = "image/png"),
        (status = 304, description = "Cached copy is current"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "The current photo could not be decoded"),
        (status = 503, description = "Still processing"),
    ),
    tag = "Sessions"
)]
pub async fn handle_session_image<S: SessionStore>(
    State(store): State<Arc<S>>,
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = find_session(store.as_ref(), &id).await?;

    match session.wait_current(config.result_wait()).await {
        Some(SessionOutput::Ready(image)) => {
            let etag = image.etag();
            if headers.matches_etag(&etag) {
                return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
            }
            Ok(png_response(&image))
        }
        Some(SessionOutput::Failed(failure)) => Err(ApiError::RunFailed(failure)),
        Some(SessionOutput::Pending) | None => Err(ApiError::NotReady),
    }
}

/// Delete a session and release its images
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn handle_delete_session<S: SessionStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    store
        .remove(&SessionId::new(id))
        .await
        .ok_or(ApiError::SessionNotFound)?;
    Ok(StatusCode::NO_CONTENT)
}
