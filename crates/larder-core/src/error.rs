//! Unified application error types for Larder.
//!
//! Every crate maps its internal failures into [`AppError`] so that the
//! `?` operator carries one error type up to the API boundary, where the
//! [`ErrorKind`] decides the caller-visible status.

use std::fmt;
use thiserror::Error;

/// Error categories used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// No `Authorization: Bearer` header was presented.
    MissingCredentialHeader,
    /// The token signature, expiry, or embedded payload did not check out.
    InvalidOrExpiredToken,
    /// The token's principal class does not match what the endpoint requires.
    PrincipalTypeMismatch,
    /// The token is well formed but has no live session entry.
    SessionNotLive,
    /// The caller's role is not sufficient for the action.
    PermissionDenied,
    /// The caller's membership exists but has been deactivated.
    AccessLocked,
    /// The requested entity was not found.
    NotFound,
    /// An entity with the same unique key already exists.
    AlreadyExists,
    /// The request conflicts with the current entity state.
    Conflict,
    /// A backing store or network call failed; safe for the caller to retry.
    Transient,
    /// Login with an unknown email or a wrong password.
    InvalidCredentials,
    /// Login before the email address was verified.
    EmailNotVerified,
    /// The account has been deactivated by an administrator.
    AccountSuspended,
    /// The invitation token is unknown or was already consumed.
    InvitationExpired,
    /// Input validation failed.
    Validation,
    /// A configuration value is missing or malformed.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentialHeader => write!(f, "MISSING_CREDENTIALS"),
            Self::InvalidOrExpiredToken => write!(f, "INVALID_TOKEN"),
            Self::PrincipalTypeMismatch => write!(f, "PRINCIPAL_TYPE_MISMATCH"),
            Self::SessionNotLive => write!(f, "SESSION_NOT_LIVE"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::AccessLocked => write!(f, "ACCESS_LOCKED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::AlreadyExists => write!(f, "ALREADY_EXIST"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::EmailNotVerified => write!(f, "VERIFY_EMAIL"),
            Self::AccountSuspended => write!(f, "SUSPEND_MESSAGE"),
            Self::InvitationExpired => write!(f, "INVITATION_EXPIRED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Larder.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredentialHeader, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOrExpiredToken, message)
    }

    pub fn principal_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PrincipalTypeMismatch, message)
    }

    pub fn session_not_live(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotLive, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    pub fn access_locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessLocked, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a transient error for a failed store or network call.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    pub fn email_not_verified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmailNotVerified, message)
    }

    pub fn account_suspended(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountSuspended, message)
    }

    pub fn invitation_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvitationExpired, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::with_source(ErrorKind::Validation, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
