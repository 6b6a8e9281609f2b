use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::errors::ResetError;
use super::token::ResetToken;
use crate::config::DEFAULT_RESET_VALIDITY_MINUTES;
use crate::store::CredentialStore;
use crate::user::User;
use crate::user::UserId;

/// Random bytes per reset token (256 bits).
pub const RESET_TOKEN_BYTES: usize = 32;

/// Issues and redeems single-use password reset tokens.
///
/// Holds no state of its own; the credential store is the only record of which
/// token is live for a user. Lifecycle of a token:
/// `absent -> issued -> consumed | expired | superseded -> absent`.
#[derive(Debug, Clone)]
pub struct ResetTokenManager {
    validity: Duration,
}

impl ResetTokenManager {
    /// Create a manager whose tokens are valid for one hour.
    pub fn new() -> Self {
        Self::with_validity(Duration::minutes(DEFAULT_RESET_VALIDITY_MINUTES))
    }

    pub fn with_validity(validity: Duration) -> Self {
        Self { validity }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Mint a fresh token for `user`, valid for one window from now.
    ///
    /// The token value is random and carries no user data.
    ///
    /// # Errors
    /// * `EntropyFailure` - The OS random source failed
    pub fn generate(&self, user: &User) -> Result<ResetToken, ResetError> {
        self.generate_at(user, Utc::now())
    }

    pub fn generate_at(&self, user: &User, now: DateTime<Utc>) -> Result<ResetToken, ResetError> {
        let value = random_token_value(&mut OsRng)?;
        tracing::debug!(user_id = %user.id, "Reset token generated");
        Ok(ResetToken::new(value, now + self.validity))
    }

    /// Mint a token and store it against `user`, superseding any previous token.
    ///
    /// # Errors
    /// * `EntropyFailure` - The OS random source failed
    /// * `Store` - Credential store operation failed
    pub async fn issue<S>(&self, store: &S, user: &User) -> Result<ResetToken, ResetError>
    where
        S: CredentialStore + ?Sized,
    {
        self.issue_at(store, user, Utc::now()).await
    }

    pub async fn issue_at<S>(
        &self,
        store: &S,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<ResetToken, ResetError>
    where
        S: CredentialStore + ?Sized,
    {
        let token = self.generate_at(user, now)?;
        store.set_reset_token(user.id, &token).await?;
        Ok(token)
    }

    /// Redeem a token, returning the user it was issued to.
    ///
    /// On success the token has already been cleared from the store, so the same
    /// value can never be redeemed twice.
    ///
    /// # Errors
    /// * `NotFound` - No user holds this token
    /// * `TokenExpired` - Stored expiry is at or before now
    /// * `Store` - Credential store operation failed
    pub async fn validate<S>(&self, store: &S, token: &str) -> Result<UserId, ResetError>
    where
        S: CredentialStore + ?Sized,
    {
        self.validate_at(store, token, Utc::now()).await
    }

    pub async fn validate_at<S>(
        &self,
        store: &S,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserId, ResetError>
    where
        S: CredentialStore + ?Sized,
    {
        if token.is_empty() {
            return Err(ResetError::NotFound);
        }

        let user = store
            .get_user_by_reset_token(token)
            .await?
            .ok_or(ResetError::NotFound)?;
        let stored = user.reset_token.as_ref().ok_or(ResetError::NotFound)?;

        if stored.is_expired_at(now) {
            tracing::warn!(
                user_id = %user.id,
                expired_at = %stored.expires_at(),
                "Expired reset token presented"
            );
            return Err(ResetError::TokenExpired);
        }

        if !store.clear_reset_token(user.id, token).await? {
            tracing::debug!(user_id = %user.id, "Reset token redeemed concurrently");
            return Err(ResetError::NotFound);
        }
        tracing::info!(user_id = %user.id, "Reset token consumed");

        Ok(user.id)
    }
}

impl Default for ResetTokenManager {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token_value<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, ResetError> {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| ResetError::EntropyFailure(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
