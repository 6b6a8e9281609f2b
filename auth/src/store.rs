use async_trait::async_trait;
use thiserror::Error;

use crate::reset::ResetToken;
use crate::user::User;
use crate::user::UserId;

/// Error raised by a credential store implementation.
///
/// Passed through the core untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Persistence of credentials, owned outside the core.
///
/// Every call is awaited in sequence by the core; nothing is retried.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user (None if not found)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Replace the stored password hash of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn update_password_hash(&self, id: UserId, password_hash: &str)
        -> Result<(), StoreError>;

    /// Store a reset token and its expiry, replacing any previous one.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn set_reset_token(&self, id: UserId, token: &ResetToken) -> Result<(), StoreError>;

    /// Retrieve the user holding exactly this reset token value.
    ///
    /// # Returns
    /// Optional user (None if no user holds the token)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Remove the reset token and its expiry, but only while the stored value is
    /// still `token`.
    ///
    /// The check and the removal must be one atomic step: of two concurrent calls
    /// with the same value at most one returns `true`, and a token stored by a
    /// later issuance is left untouched.
    ///
    /// # Returns
    /// Whether a token was removed
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn clear_reset_token(&self, id: UserId, token: &str) -> Result<bool, StoreError>;
}
