use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::api::headers::upload_from_request;
use crate::error::ApiError;
use crate::models::ProcessedImage;
use crate::services::ProcessingService;

/// Query parameters for one-shot conversion
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    /// Swap shadow and highlight colors
    #[serde(default)]
    pub reversed: bool,
}

/// Convert a photo to a duotone PNG
///
/// The request body is the raw image (JPEG, PNG or WebP). The response is
/// the PNG rendition, offered as a download.
#[utoipa::path(
    post,
    path = "/api/duotone",
    request_body(content = Vec<u8>, description = "Image bytes", content_type = "application/octet-stream"),
    params(
        ConvertQuery,
        ("X-Filename" = Option<String>, Header, description = "Original file name, used for the download name"),
    ),
    responses(
        (status = 200, description = "Duotone PNG", content_type = "image/png"),
        (status = 400, description = "Empty upload"),
        (status = 413, description = "Upload too large"),
        (status = 415, description = "Not a JPEG, PNG or WebP image"),
        (status = 422, description = "Image could not be decoded"),
    ),
    tag = "Duotone"
)]
pub async fn handle_convert(
    State(processor): State<Arc<ProcessingService>>,
    Query(query): Query<ConvertQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let upload = upload_from_request(&headers, body);
    tracing::info!(
        size_bytes = upload.bytes.len(),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        reversed = query.reversed,
        "Conversion request received"
    );

    let image = processor.process(upload, query.reversed).await?;
    Ok(png_response(&image))
}

/// Serve a finished rendition as a PNG download
pub fn png_response(image: &ProcessedImage) -> Response {
    let mut response = (StatusCode::OK, image.png_bytes.clone()).into_response();
    let headers = response.headers_mut();

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(image.png_bytes.len()));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(etag) = HeaderValue::from_str(&image.etag()) {
        headers.insert(header::ETAG, etag);
    }
    let disposition = format!("attachment; filename=\"{}\"", image.filename);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    response
}
