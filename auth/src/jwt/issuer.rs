use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;
use super::token::SignedToken;
use crate::config::JwtSecret;
use crate::config::DEFAULT_TOKEN_VALIDITY_MINUTES;

/// Signs session tokens with the process secret (HS256).
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    validity: Duration,
}

impl TokenIssuer {
    /// Create an issuer whose tokens are valid for one hour.
    pub fn new(secret: &JwtSecret) -> Self {
        Self::with_validity(secret, Duration::minutes(DEFAULT_TOKEN_VALIDITY_MINUTES))
    }

    pub fn with_validity(secret: &JwtSecret, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign claims, expiring one validity window from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Serialization or signing failed
    pub fn issue(&self, claims: Claims) -> Result<SignedToken, JwtError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign claims as of `now`. The embedded expiry is `now + validity`, replacing
    /// whatever expiry `claims` carried.
    ///
    /// # Errors
    /// * `SigningFailed` - Serialization or signing failed
    pub fn issue_at(&self, claims: Claims, now: DateTime<Utc>) -> Result<SignedToken, JwtError> {
        let claims = claims.with_expiration((now + self.validity).timestamp());
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map(SignedToken::from)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }
}
