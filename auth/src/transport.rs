//! Carrying session tokens over HTTP: the `jwt-token` cookie and the bearer header.

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::SignedToken;

pub const SESSION_COOKIE_NAME: &str = "jwt-token";
pub const BEARER_PREFIX: &str = "Bearer ";
pub const SESSION_COOKIE_MINUTES: i64 = 60;

/// Extract the token from an `Authorization` header value.
///
/// Exactly one `Bearer ` prefix is stripped.
///
/// # Errors
/// * `Malformed` - Prefix is absent or nothing follows it
pub fn bearer_token(header_value: &str) -> Result<&str, JwtError> {
    let token = header_value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        JwtError::Malformed("expected `Authorization: Bearer <token>`".to_string())
    })?;

    if token.is_empty() {
        return Err(JwtError::Malformed("empty bearer token".to_string()));
    }

    Ok(token)
}

/// Extract the session token from a `Cookie` request header value.
///
/// # Errors
/// * `Malformed` - No non-empty `jwt-token` cookie is present
pub fn session_token_from_cookies(cookie_header: &str) -> Result<&str, JwtError> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| JwtError::Malformed(format!("missing `{}` cookie", SESSION_COOKIE_NAME)))
}

/// The `jwt-token` cookie handed to the client.
///
/// Always `HttpOnly`, `Secure`, `SameSite=None`, scoped to `/`.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    value: String,
    expires: DateTime<Utc>,
}

impl SessionCookie {
    /// Cookie carrying `token`, expiring 60 minutes after `now`.
    pub fn issued(token: &SignedToken, now: DateTime<Utc>) -> Self {
        Self {
            value: token.as_str().to_string(),
            expires: now + Duration::minutes(SESSION_COOKIE_MINUTES),
        }
    }

    /// Empty cookie expired at the Unix epoch, which makes the client drop its session.
    pub fn cleared() -> Self {
        Self {
            value: String::new(),
            expires: DateTime::<Utc>::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        SESSION_COOKIE_NAME
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; Path=/; Expires={}; HttpOnly; Secure; SameSite=None",
            SESSION_COOKIE_NAME,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
        )
    }
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &SESSION_COOKIE_NAME)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}
