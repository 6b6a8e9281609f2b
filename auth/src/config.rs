use std::fmt;

use chrono::Duration;
use thiserror::Error;

use crate::password::HashCost;

/// Minimum accepted length of the signing secret, in bytes (256 bits for HS256).
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default lifetime of a signed session token.
pub const DEFAULT_TOKEN_VALIDITY_MINUTES: i64 = 60;

/// Default lifetime of a password reset token.
pub const DEFAULT_RESET_VALIDITY_MINUTES: i64 = 60;

/// Error for invalid authentication settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret is not configured")]
    SecretMissing,

    #[error("JWT secret too short: minimum {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Invalid validity window for {name}: {minutes} minutes")]
    InvalidValidity { name: &'static str, minutes: i64 },
}

/// Process-wide symmetric key used to sign and verify session tokens.
///
/// Can only be constructed from a secret of at least [`MIN_SECRET_LENGTH`] bytes,
/// so an issuer or verifier never exists with an empty or weak key.
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Validate and wrap a secret loaded from trusted configuration.
    ///
    /// # Errors
    /// * `SecretMissing` - Secret is empty
    /// * `SecretTooShort` - Secret is shorter than the minimum length
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::SecretMissing);
        }
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self(secret))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(<redacted>)")
    }
}

/// Settings for the authentication core, constructed once at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: JwtSecret,
    pub token_validity: Duration,
    pub reset_validity: Duration,
    pub hash_cost: HashCost,
}

impl AuthSettings {
    /// Settings with the default validity windows and hashing cost.
    pub fn new(secret: JwtSecret) -> Self {
        Self {
            secret,
            token_validity: Duration::minutes(DEFAULT_TOKEN_VALIDITY_MINUTES),
            reset_validity: Duration::minutes(DEFAULT_RESET_VALIDITY_MINUTES),
            hash_cost: HashCost::default(),
        }
    }

    /// Override the session token lifetime.
    ///
    /// # Errors
    /// * `InvalidValidity` - Window is zero or negative
    pub fn with_token_validity_minutes(mut self, minutes: i64) -> Result<Self, ConfigError> {
        self.token_validity = positive_window("token", minutes)?;
        Ok(self)
    }

    /// Override the reset token lifetime.
    ///
    /// # Errors
    /// * `InvalidValidity` - Window is zero or negative
    pub fn with_reset_validity_minutes(mut self, minutes: i64) -> Result<Self, ConfigError> {
        self.reset_validity = positive_window("reset", minutes)?;
        Ok(self)
    }

    pub fn with_hash_cost(mut self, hash_cost: HashCost) -> Self {
        self.hash_cost = hash_cost;
        self
    }
}

fn positive_window(name: &'static str, minutes: i64) -> Result<Duration, ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::InvalidValidity { name, minutes });
    }
    Ok(Duration::minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_rejects_empty() {
        assert_eq!(JwtSecret::new("").unwrap_err(), ConfigError::SecretMissing);
    }

    #[test]
    fn test_secret_rejects_short() {
        let err = JwtSecret::new("too-short").unwrap_err();
        assert_eq!(
            err,
            ConfigError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
                actual: 9
            }
        );
    }

    #[test]
    fn test_secret_accepts_minimum_length() {
        assert!(JwtSecret::new(vec![7u8; MIN_SECRET_LENGTH]).is_ok());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = JwtSecret::new("super_secret_value_at_least_32_bytes").unwrap();
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("super_secret"));
    }

    #[test]
    fn test_settings_defaults() {
        let secret = JwtSecret::new("test_secret_key_at_least_32_bytes!").unwrap();
        let settings = AuthSettings::new(secret);
        assert_eq!(settings.token_validity, Duration::hours(1));
        assert_eq!(settings.reset_validity, Duration::hours(1));
    }

    #[test]
    fn test_settings_reject_non_positive_window() {
        let secret = JwtSecret::new("test_secret_key_at_least_32_bytes!").unwrap();
        let result = AuthSettings::new(secret).with_token_validity_minutes(0);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValidity { name: "token", .. })
        ));
    }
}
