use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use duotone_core::EngineError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::RunFailure;

/// Error classes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed request or unusable buffer; a caller bug, never retried
    InvalidInput,
    /// The bytes could not be decoded as an image
    DecodeFailure,
    /// Not a JPEG, PNG or WebP upload
    UnsupportedFormat,
    /// Upload exceeds the configured size limit
    OversizedInput,
    /// Encoding or task failure
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::DecodeFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::OversizedInput => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid pixel buffer: {0}")]
    Engine(#[from] EngineError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Upload too large: {size} bytes (max {max})")]
    OversizedInput { size: usize, max: usize },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::InvalidInput(_) | ProcessError::Engine(_) => ErrorKind::InvalidInput,
            ProcessError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ProcessError::OversizedInput { .. } => ErrorKind::OversizedInput,
            ProcessError::Decode(_) => ErrorKind::DecodeFailure,
            ProcessError::PngEncode(_) | ProcessError::Task(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Message suitable for showing to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            ProcessError::InvalidInput(_) | ProcessError::Engine(_) => {
                "This image could not be processed. Please choose a different file.".to_string()
            }
            ProcessError::UnsupportedFormat(_) => {
                "Please select a valid image file (JPEG, PNG, or WebP)".to_string()
            }
            ProcessError::OversizedInput { max, .. } => {
                format!("File size must be less than {}MB", max / (1024 * 1024))
            }
            ProcessError::Decode(_) => {
                "Failed to load image. Please try a different file.".to_string()
            }
            ProcessError::PngEncode(_) | ProcessError::Task(_) => {
                "Something went wrong while processing the image. Please try again.".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Result not ready")]
    NotReady,

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Processing failed: {}", .0.message)]
    RunFailed(RunFailure),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::SessionNotFound => (StatusCode::NOT_FOUND, None, self.to_string()),
            ApiError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                Some(ErrorKind::InvalidInput),
                self.to_string(),
            ),
            ApiError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                None,
                "The image is still being processed. Please try again shortly.".to_string(),
            ),
            ApiError::Process(e) => {
                let kind = e.kind();
                if kind == ErrorKind::Internal {
                    tracing::error!(error = %e, "Processing failed");
                } else {
                    tracing::debug!(error = %e, "Rejected upload");
                }
                (kind.status_code(), Some(kind), e.user_message())
            }
            ApiError::RunFailed(f) => (f.kind.status_code(), Some(f.kind), f.message.clone()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
