use serde::Deserialize;
use serde::Serialize;

use crate::user::Role;
use crate::user::User;
use crate::user::UserId;

/// Identity payload of a session token.
///
/// Decoded with a strict schema: a payload with missing or unknown fields does not
/// produce `Claims`. Fields are read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject (user identifier)
    sub: UserId,

    email: String,

    role: Role,

    /// Expiration time (Unix timestamp, seconds)
    exp: i64,
}

impl Claims {
    /// Create claims for a user. The expiry is assigned when the token is issued.
    pub fn new(user_id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            sub: user_id,
            email: email.into(),
            role,
            exp: 0,
        }
    }

    /// Create claims describing a stored user.
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.email.clone(), user.role)
    }

    /// Copy of these claims with a different expiration (Unix timestamp).
    pub fn with_expiration(self, exp: i64) -> Self {
        Self { exp, ..self }
    }

    pub fn user_id(&self) -> UserId {
        self.sub
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid from its expiry second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
