//! Credential and session-trust core
//!
//! Provides the security-sensitive part of account handling:
//! - Password hashing (Argon2id)
//! - Signed session tokens (HS256 JWT) and their transport as cookie or bearer header
//! - Single-use, time-limited password reset tokens
//! - Authentication coordination over a [`CredentialStore`]
//!
//! Persistence, mail delivery and HTTP routing stay outside; they reach this crate
//! through the [`CredentialStore`] trait and the values it returns.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Claims, JwtSecret, Role, TokenIssuer, TokenVerifier, UserId};
//!
//! let secret = JwtSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(&secret);
//! let verifier = TokenVerifier::new(&secret);
//!
//! let token = issuer
//!     .issue(Claims::new(UserId(1), "a@x.com", Role::General))
//!     .unwrap();
//! let claims = verifier.verify(token.as_str()).unwrap();
//! assert_eq!(claims.email(), "a@x.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AuthSettings, Authenticator, JwtSecret, Role, User, UserId};
//!
//! let secret = JwtSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&AuthSettings::new(secret)).unwrap();
//!
//! let user = User {
//!     id: UserId(1),
//!     email: "a@x.com".to_string(),
//!     password_hash: auth.hash_password("secret123").unwrap(),
//!     role: Role::General,
//!     reset_token: None,
//! };
//!
//! let session = auth.authenticate("secret123", &user).unwrap();
//! let claims = auth.validate_token(session.access_token.as_str()).unwrap();
//! assert_eq!(claims.user_id(), UserId(1));
//! ```

pub mod authenticator;
pub mod config;
pub mod jwt;
pub mod password;
pub mod reset;
pub mod store;
pub mod transport;
pub mod user;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use config::AuthSettings;
pub use config::ConfigError;
pub use config::JwtSecret;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::SignedToken;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use reset::ResetError;
pub use reset::ResetToken;
pub use reset::ResetTokenManager;
pub use store::CredentialStore;
pub use store::StoreError;
pub use transport::SessionCookie;
pub use user::Role;
pub use user::User;
pub use user::UserId;
