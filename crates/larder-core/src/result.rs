//! Convenience result type alias for Larder.

use crate::error::AppError;

/// A specialized `Result` type for Larder operations.
pub type AppResult<T> = Result<T, AppError>;
