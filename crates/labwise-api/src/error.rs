use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use labwise_core::store::StoreError;
use labwise_core::submit::SubmitError;
use labwise_interpret::error::InterpretError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    /// Period report limit reached; the client redirects to billing.
    QuotaExceeded(String),
    /// The interpretation collaborator failed; the client offers a retry.
    Upstream(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    upgrade_required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retry_available: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, upgrade_required, retry_available) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, false, false),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false, false),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, false, false),
            ApiError::QuotaExceeded(msg) => (StatusCode::PAYMENT_REQUIRED, msg, true, false),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg, false, true),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    false,
                    false,
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                upgrade_required,
                retry_available,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(format!("row not found: {what}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Validation(v) => ApiError::BadRequest(v.to_string()),
            SubmitError::QuotaExceeded { .. } => ApiError::QuotaExceeded(e.to_string()),
            SubmitError::QuotaUnavailable(msg) => {
                ApiError::Upstream(format!("unable to verify usage limits: {msg}"))
            }
            SubmitError::Store(s) => s.into(),
        }
    }
}

impl From<InterpretError> for ApiError {
    fn from(e: InterpretError) -> Self {
        match e {
            InterpretError::Store(s) => s.into(),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<labwise_export::error::ExportError> for ApiError {
    fn from(e: labwise_export::error::ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
