//! Convenience result type alias for Chatty.

use crate::error::AppError;

/// A specialized `Result` type for Chatty operations.
pub type AppResult<T> = Result<T, AppError>;
