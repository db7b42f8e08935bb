//! API error type
//!
//! Every failure a handler can produce is one variant here; the mapping to
//! status code and JSON body happens only in [`IntoResponse`].

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no `file` field (or was not multipart at all)
    #[error("No file part")]
    NoFilePart,

    /// The `file` field had an empty file name
    #[error("No selected file")]
    NoSelectedFile,

    /// Multipart body could not be read (malformed, or over the size limit)
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    /// Unexpected failure while serving a request
    #[error("{0}")]
    Internal(String),

    /// Failure in the `/status` endpoint, reported in its own envelope
    #[error("{0}")]
    Status(String),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFilePart | ApiError::NoSelectedFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Internal(_) | ApiError::Status(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Status(message) => json!({ "status": "error", "message": message }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
