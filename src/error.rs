//! Fallback reasons for recoverable steps and the errors surfaced to HTTP callers.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::error::LookupError;

/// Result of a recoverable derivation sub-step.
pub type Fallible<T> = Result<T, FallbackReason>;

/// Why a sub-step gave up and let its caller substitute a documented fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    /// The collaborator did not answer within the configured timeout.
    #[error("timed out")]
    Timeout,
    /// The collaborator answered with an error.
    #[error("lookup failed: {0}")]
    Lookup(String),
    /// The lookup succeeded but produced nothing usable.
    #[error("no usable candidates")]
    NoCandidates,
    /// Fetched vector markup is not a usable SVG document.
    #[error("unusable markup for `{0}`")]
    UnusableMarkup(String),
    /// A hex colour could not be parsed.
    #[error("malformed colour `{0}`")]
    MalformedColor(String),
    /// The image holds no opaque pixels to sample from.
    #[error("image has no opaque pixels")]
    NoOpaquePixels,
    /// Decoding raster or vector data failed.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Rendering or rasterizing a derived image failed.
    #[error("render failed: {0}")]
    Render(String),
    /// Encoding a derived image failed.
    #[error("encode failed: {0}")]
    Encode(String),
    /// Writing an asset failed.
    #[error("storage write failed: {0}")]
    Storage(String),
}

impl From<LookupError> for FallbackReason {
    fn from(err: LookupError) -> Self {
        FallbackReason::Lookup(err.to_string())
    }
}

/// Errors that can escape the derivation engine.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The source logo could not be decoded at all, so no bundle can be produced.
    #[error("source image unreadable: {0}")]
    SourceImageUnreadable(String),
    /// A background worker failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Input was well-formed but could not be processed.
    #[error("generation failed: {0}")]
    Unprocessable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::SourceImageUnreadable(message) => AppError::Unprocessable(message),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
