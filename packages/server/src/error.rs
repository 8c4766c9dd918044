use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StoreError;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `INVALID_MEDIA_TYPE`, `PAYLOAD_TOO_LARGE`, `INVALID_IDENTIFIER`,
    /// `INVALID_PATH`, `NOT_FOUND`, `STORAGE_WRITE_FAILURE`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "INVALID_MEDIA_TYPE")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "unsupported media type: application/pdf")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidMediaType(String),
    PayloadTooLarge(String),
    InvalidIdentifier(String),
    InvalidPath(String),
    NotFound(String),
    StorageWrite(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::InvalidMediaType(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorBody {
                    code: "INVALID_MEDIA_TYPE",
                    message: format!("unsupported media type: {mime}"),
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "PAYLOAD_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::InvalidIdentifier(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_IDENTIFIER",
                    message: msg,
                },
            ),
            AppError::InvalidPath(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_PATH",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::StorageWrite(detail) => {
                tracing::error!("Storage write failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_WRITE_FAILURE",
                        message: "Failed to persist asset".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidMediaType(mime) => AppError::InvalidMediaType(mime),
            StoreError::PayloadTooLarge { actual, limit } => AppError::PayloadTooLarge(format!(
                "payload of {actual} bytes exceeds limit of {limit} bytes"
            )),
            StoreError::InvalidIdentifier(msg) => AppError::InvalidIdentifier(msg),
            StoreError::InvalidPath(msg) => AppError::InvalidPath(msg),
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Decode(msg) => AppError::Validation(format!("could not process image: {msg}")),
            StoreError::Io(e) => AppError::StorageWrite(e.to_string()),
        }
    }
}
