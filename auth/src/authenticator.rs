use chrono::DateTime;
use chrono::Utc;

use crate::config::AuthSettings;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::SignedToken;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::reset::ResetError;
use crate::reset::ResetToken;
use crate::reset::ResetTokenManager;
use crate::store::CredentialStore;
use crate::store::StoreError;
use crate::transport;
use crate::transport::SessionCookie;
use crate::user::User;
use crate::user::UserId;

/// Authentication coordinator combining password verification, session tokens and
/// password reset.
///
/// Built once from [`AuthSettings`] and shared; holds no mutable state.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_verifier: TokenVerifier,
    reset_tokens: ResetTokenManager,
    // Verified against when the email is unknown so both login failures cost one hash.
    dummy_hash: String,
}

const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: SignedToken,
    /// Claims embedded in `access_token`
    pub claims: Claims,
    /// `jwt-token` cookie carrying `access_token`
    pub cookie: SessionCookie,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Reset token error: {0}")]
    Reset(#[from] ResetError),

    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `PasswordError` - Configured hashing cost is out of range
    pub fn new(settings: &AuthSettings) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::with_cost(settings.hash_cost)?;
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            dummy_hash,
            token_issuer: TokenIssuer::with_validity(&settings.secret, settings.token_validity),
            token_verifier: TokenVerifier::new(&settings.secret),
            reset_tokens: ResetTokenManager::with_validity(settings.reset_validity),
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a user's stored hash and issue a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash could not be checked
    /// * `Jwt` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        user: &User,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.authenticate_at(password, user, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        password: &str,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_session_at(Claims::for_user(user), now)?)
    }

    /// Look up a user by email and authenticate them.
    ///
    /// An unknown email and a wrong password are the same error.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Store` - Credential store operation failed
    /// * Any error of [`authenticate`](Self::authenticate)
    pub async fn login<S>(
        &self,
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AuthenticationError>
    where
        S: CredentialStore + ?Sized,
    {
        let Some(user) = store.get_user_by_email(email).await? else {
            let _ = self.password_hasher.verify(password, &self.dummy_hash);
            tracing::debug!("Login rejected: unknown email");
            return Err(AuthenticationError::InvalidCredentials);
        };

        let result = self.authenticate(password, &user);
        match &result {
            Ok(_) => tracing::info!(user_id = %user.id, "User logged in"),
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(user_id = %user.id, "Login rejected: password mismatch")
            }
            Err(e) => tracing::error!(user_id = %user.id, error = %e, "Login failed"),
        }
        result
    }

    /// Issue a session for already established claims.
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue_session(&self, claims: Claims) -> Result<AuthenticationResult, JwtError> {
        self.issue_session_at(claims, Utc::now())
    }

    pub fn issue_session_at(
        &self,
        claims: Claims,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let access_token = self.token_issuer.issue_at(claims.clone(), now)?;
        let claims = claims.with_expiration((now + self.token_issuer.validity()).timestamp());
        let cookie = SessionCookie::issued(&access_token, now);

        Ok(AuthenticationResult {
            access_token,
            claims,
            cookie,
        })
    }

    /// Validate a raw session token (cookie value or stripped header).
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_verifier.verify(token)
    }

    /// Validate the value of an `Authorization: Bearer <token>` header.
    pub fn validate_bearer(&self, header_value: &str) -> Result<Claims, JwtError> {
        self.token_verifier.verify_bearer(header_value)
    }

    /// Validate the session token inside a `Cookie` request header.
    pub fn validate_cookie_header(&self, cookie_header: &str) -> Result<Claims, JwtError> {
        self.token_verifier
            .verify(transport::session_token_from_cookies(cookie_header)?)
    }

    pub fn token_verifier(&self) -> &TokenVerifier {
        &self.token_verifier
    }

    /// Store a fresh reset token for `user`, superseding any earlier one.
    ///
    /// # Errors
    /// * `ResetError` - Entropy or store failure
    pub async fn begin_password_reset<S>(
        &self,
        store: &S,
        user: &User,
    ) -> Result<ResetToken, ResetError>
    where
        S: CredentialStore + ?Sized,
    {
        self.reset_tokens.issue(store, user).await
    }

    /// Redeem a reset token and store a hash of the new password.
    ///
    /// The token is cleared before the new hash is written, so a failure after
    /// redemption requires a new reset request.
    ///
    /// # Errors
    /// * `Reset` - Token unknown, expired, or store failure while redeeming
    /// * `Password` - Hashing failed
    /// * `Store` - Writing the new hash failed
    pub async fn complete_password_reset<S>(
        &self,
        store: &S,
        token: &str,
        new_password: &str,
    ) -> Result<UserId, AuthenticationError>
    where
        S: CredentialStore + ?Sized,
    {
        let user_id = self.reset_tokens.validate(store, token).await?;
        let password_hash = self.password_hasher.hash(new_password)?;
        store.update_password_hash(user_id, &password_hash).await?;

        tracing::info!(user_id = %user_id, "Password reset completed");
        Ok(user_id)
    }
}
