//! Request parsing utilities for uploads.

use axum::{
    body::Bytes,
    extract::rejection::{BytesRejection, JsonRejection},
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::error::{ApiError, ProcessError};
use crate::models::Upload;

/// Header carrying the original file name of an upload
pub const FILENAME_HEADER: &str = "X-Filename";

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing or not visible ASCII.
    fn get_str(&self, name: &str) -> Option<&str>;

    /// Get a non-blank header value, trimmed.
    fn get_trimmed(&self, name: &str) -> Option<&str>;

    /// Get a header value parsed as a type, returning None if missing or invalid.
    fn get_parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T>;

    /// Does `If-None-Match` list this entity tag (or `*`)?
    fn matches_etag(&self, etag: &str) -> bool;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn get_trimmed(&self, name: &str) -> Option<&str> {
        self.get_str(name).map(str::trim).filter(|v| !v.is_empty())
    }

    fn get_parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get_str(name).and_then(|v| v.trim().parse().ok())
    }

    fn matches_etag(&self, etag: &str) -> bool {
        self.get_str(header::IF_NONE_MATCH.as_str())
            .map(|v| {
                v.split(',')
                    .map(|t| t.trim().trim_start_matches("W/"))
                    .any(|t| t == "*" || t == etag)
            })
            .unwrap_or(false)
    }
}

/// Turn a body extraction failure into the same error the validator reports.
///
/// Bodies over the router's limit are rejected while buffering, before the
/// validator ever sees them.
pub fn read_body(
    body: Result<Bytes, BytesRejection>,
    headers: &HeaderMap,
    max_bytes: usize,
) -> Result<Bytes, ApiError> {
    match body {
        Ok(bytes) => Ok(bytes),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let size = headers
                .get_parsed::<usize>(header::CONTENT_LENGTH.as_str())
                .unwrap_or(max_bytes.saturating_add(1));
            Err(ProcessError::OversizedInput {
                size,
                max: max_bytes,
            }
            .into())
        }
        Err(rejection) => Err(ProcessError::InvalidInput(rejection.body_text()).into()),
    }
}

/// Unwrap a JSON body, reporting syntax, type and content-type problems
/// as a 400 with the usual error body.
pub fn read_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

/// Build an [`Upload`] from a raw request body and its headers.
pub fn upload_from_request(headers: &HeaderMap, body: Bytes) -> Upload {
    let mut upload = Upload::new(body);
    if let Some(content_type) = headers.get_trimmed(header::CONTENT_TYPE.as_str()) {
        upload = upload.with_content_type(content_type);
    }
    if let Some(filename) = headers.get_trimmed(FILENAME_HEADER) {
        upload = upload.with_filename(filename);
    }
    upload
}
