//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use provision_core::ProvisionError;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No link exists for the account.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another provisioning attempt for this account is in flight.
    #[error("provisioning in progress")]
    InProgress,

    /// A previous provisioning attempt failed terminally.
    #[error("provisioning previously failed: {0}")]
    ProvisioningFailed(String),

    /// The provider rejected the input on this call.
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// The provider is unreachable; the caller may retry with backoff.
    #[error("provider unavailable")]
    Unavailable,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
///
/// Flat shape consumed by the front end: a stable `error` code plus an
/// optional human-readable `reason`.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, reason) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, "bad_request", Some(reason)),
            Self::NotFound(reason) => (StatusCode::NOT_FOUND, "not_found", Some(reason)),
            Self::InProgress => (StatusCode::CONFLICT, "in_progress", None),
            Self::ProvisioningFailed(reason) => (StatusCode::CONFLICT, "failed", Some(reason)),
            Self::Rejected(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "rejected",
                Some(reason),
            ),
            Self::Unavailable => (StatusCode::BAD_GATEWAY, "unavailable", None),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        (status, Json(ErrorResponse { error, reason })).into_response()
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::InProgress { .. } => Self::InProgress,
            ProvisionError::Failed { reason, .. } => Self::ProvisioningFailed(reason),
            ProvisionError::Rejected { reason } => Self::Rejected(reason),
            ProvisionError::Unavailable { .. } => Self::Unavailable,
            ProvisionError::NotFound { account_key } => {
                Self::NotFound(format!("no customer link for account {account_key}"))
            }
            ProvisionError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl From<provision_store::StoreError> for ApiError {
    fn from(err: provision_store::StoreError) -> Self {
        match err {
            provision_store::StoreError::NotFound { account_key } => {
                Self::NotFound(format!("no customer link for account {account_key}"))
            }
            provision_store::StoreError::Conflict { .. } => Self::InProgress,
            provision_store::StoreError::Database(msg)
            | provision_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
