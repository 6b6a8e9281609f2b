use async_trait::async_trait;
use auth::AuthenticationResult;
use auth::CredentialStore;
use auth::ResetToken;
use auth::SessionCookie;
use auth::StoreError;
use auth::User;

use super::errors::CredentialError;
use super::errors::MailError;
use super::models::NewUser;
use super::models::RegisterUserCommand;

/// Port for credential service operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new account with a hashed password.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `Store` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, CredentialError>;

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Store` - Store operation failed
    async fn login(&self, email: &str, password: &str)
        -> Result<AuthenticationResult, CredentialError>;

    /// Cookie that ends the client's session.
    fn logout(&self) -> SessionCookie;

    /// Resolve the user behind a raw session token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, forged or expired
    /// * `UserNotFound` - Token subject no longer exists
    /// * `Store` - Store operation failed
    async fn current_user(&self, token: &str) -> Result<User, CredentialError>;

    /// Issue a reset token for the account and mail it.
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this email
    /// * `Reset` - Random source failed
    /// * `Mail` - Delivery failed
    /// * `Store` - Store operation failed
    async fn forgot_password(&self, email: &str) -> Result<(), CredentialError>;

    /// Redeem a reset token and replace the password.
    ///
    /// # Errors
    /// * `Reset` - Token unknown, already used, superseded or expired
    /// * `Password` - Hashing failed
    /// * `Store` - Store operation failed
    async fn reset_password(&self, token: &str, new_password: &str)
        -> Result<(), CredentialError>;
}

/// Credential persistence extended with account creation.
#[async_trait]
pub trait UserRepository: CredentialStore {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Database` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

/// Delivery of password reset mail.
#[async_trait]
pub trait MailSender: Send + Sync + 'static {
    /// Send the reset token to the account's address.
    ///
    /// # Errors
    /// * `DeliveryFailed` - Mail could not be sent
    async fn send_reset_email(&self, email: &str, reset_token: &ResetToken)
        -> Result<(), MailError>;
}
