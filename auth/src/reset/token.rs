use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// Opaque password reset token with its absolute expiry.
///
/// `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is expired from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
