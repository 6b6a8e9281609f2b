use auth::AuthenticationError;
use auth::JwtError;
use auth::PasswordError;
use auth::ResetError;
use auth::StoreError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for reset mail delivery
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("Failed to deliver reset email: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for credential operations
///
/// Callers map `InvalidCredentials`, `Unauthorized` and `Reset` to an
/// unauthorized response and the infrastructure variants to a server error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] JwtError),

    #[error("Reset rejected: {0}")]
    Reset(ResetError),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailAlreadyExists(email) => CredentialError::EmailAlreadyExists(email),
            other => CredentialError::Store(other),
        }
    }
}

impl From<ResetError> for CredentialError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::Store(store) => store.into(),
            other => CredentialError::Reset(other),
        }
    }
}

impl From<AuthenticationError> for CredentialError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => CredentialError::InvalidCredentials,
            AuthenticationError::Password(e) => e.into(),
            AuthenticationError::Jwt(e) => e.into(),
            AuthenticationError::Reset(e) => e.into(),
            AuthenticationError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use auth::UserId;

    use super::*;

    #[test]
    fn test_reset_store_failure_is_infrastructure() {
        let err: CredentialError =
            ResetError::Store(StoreError::Database("down".to_string())).into();
        assert_eq!(
            err,
            CredentialError::Store(StoreError::Database("down".to_string()))
        );
    }

    #[test]
    fn test_store_conflict_maps_to_domain_error() {
        let err: CredentialError = StoreError::EmailAlreadyExists("a@x.com".to_string()).into();
        assert_eq!(err, CredentialError::EmailAlreadyExists("a@x.com".to_string()));

        let err: CredentialError = StoreError::UserNotFound(UserId(3)).into();
        assert!(matches!(err, CredentialError::Store(_)));
    }

    #[test]
    fn test_authentication_errors_keep_their_meaning() {
        assert_eq!(
            CredentialError::from(AuthenticationError::InvalidCredentials),
            CredentialError::InvalidCredentials
        );
        assert_eq!(
            CredentialError::from(AuthenticationError::Jwt(JwtError::TokenExpired)),
            CredentialError::Unauthorized(JwtError::TokenExpired)
        );
        assert_eq!(
            CredentialError::from(AuthenticationError::Reset(ResetError::NotFound)),
            CredentialError::Reset(ResetError::NotFound)
        );
    }
}
