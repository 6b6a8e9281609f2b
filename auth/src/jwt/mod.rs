pub mod claims;
pub mod errors;
pub mod issuer;
pub mod token;
pub mod verifier;

pub use claims::Claims;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use token::SignedToken;
pub use verifier::TokenVerifier;
