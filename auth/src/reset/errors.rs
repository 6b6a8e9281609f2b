use thiserror::Error;

use crate::store::StoreError;

/// Error type for password reset token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResetError {
    #[error("Random source unavailable: {0}")]
    EntropyFailure(String),

    #[error("Reset token not found")]
    NotFound,

    #[error("Reset token is expired")]
    TokenExpired,

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),
}
