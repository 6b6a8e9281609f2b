use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::Role;
use auth::SessionCookie;
use auth::User;

use crate::domain::credentials::errors::CredentialError;
use crate::domain::credentials::models::NewUser;
use crate::domain::credentials::models::RegisterUserCommand;
use crate::domain::credentials::ports::CredentialServicePort;
use crate::domain::credentials::ports::MailSender;
use crate::domain::credentials::ports::UserRepository;

/// Domain service implementation for credential operations.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<UR, MS>
where
    UR: UserRepository,
    MS: MailSender,
{
    repository: Arc<UR>,
    mail_sender: Arc<MS>,
    authenticator: Arc<Authenticator>,
    admin_emails: Vec<String>,
}

impl<UR, MS> CredentialService<UR, MS>
where
    UR: UserRepository,
    MS: MailSender,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential persistence implementation
    /// * `mail_sender` - Reset mail delivery implementation
    /// * `authenticator` - Authentication core built from validated settings
    pub fn new(
        repository: Arc<UR>,
        mail_sender: Arc<MS>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            mail_sender,
            authenticator,
            admin_emails: Vec::new(),
        }
    }

    /// Grant the admin role to these emails on registration.
    pub fn with_admin_emails(mut self, admin_emails: Vec<String>) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    fn role_for(&self, email: &str) -> Role {
        if self
            .admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
        {
            Role::Admin
        } else {
            Role::General
        }
    }
}

#[async_trait]
impl<UR, MS> CredentialServicePort for CredentialService<UR, MS>
where
    UR: UserRepository,
    MS: MailSender,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, CredentialError> {
        let email = command.email.as_str();
        if self.repository.get_user_by_email(email).await?.is_some() {
            return Err(CredentialError::EmailAlreadyExists(email.to_string()));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;
        let new_user = NewUser {
            email: email.to_string(),
            password_hash,
            role: self.role_for(email),
        };

        let user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResult, CredentialError> {
        Ok(self
            .authenticator
            .login(self.repository.as_ref(), email, password)
            .await?)
    }

    fn logout(&self) -> SessionCookie {
        SessionCookie::cleared()
    }

    async fn current_user(&self, token: &str) -> Result<User, CredentialError> {
        let claims = self.authenticator.validate_token(token)?;

        self.repository
            .get_user_by_email(claims.email())
            .await?
            .filter(|user| user.id == claims.user_id())
            .ok_or_else(|| CredentialError::UserNotFound(claims.email().to_string()))
    }

    async fn forgot_password(&self, email: &str) -> Result<(), CredentialError> {
        let user = self
            .repository
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(email.to_string()))?;

        let reset_token = self
            .authenticator
            .begin_password_reset(self.repository.as_ref(), &user)
            .await?;

        if let Err(e) = self
            .mail_sender
            .send_reset_email(&user.email, &reset_token)
            .await
        {
            tracing::error!(user_id = %user.id, error = %e, "Failed to send reset email");
            return Err(e.into());
        }

        tracing::info!(user_id = %user.id, "Password reset instructions sent");
        Ok(())
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), CredentialError> {
        self.authenticator
            .complete_password_reset(self.repository.as_ref(), token, new_password)
            .await?;
        Ok(())
    }
}
