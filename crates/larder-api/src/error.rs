//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use larder_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind.
///
/// "Not logged in" is 401, "not allowed" is 403, and "access revoked"
/// is 423, so clients can tell the three apart.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingCredentialHeader
        | ErrorKind::InvalidOrExpiredToken
        | ErrorKind::PrincipalTypeMismatch
        | ErrorKind::SessionNotLive
        | ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorKind::PermissionDenied | ErrorKind::AccountSuspended => StatusCode::FORBIDDEN,
        ErrorKind::AccessLocked => StatusCode::LOCKED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation | ErrorKind::EmailNotVerified | ErrorKind::Serialization => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::InvitationExpired => StatusCode::GONE,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        match err.kind {
            ErrorKind::Internal | ErrorKind::Configuration => {
                tracing::error!(error = %err.message, "Internal server error");
            }
            ErrorKind::Transient => {
                tracing::warn!(error = %err.message, "Backing store unavailable");
            }
            _ => {}
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
