use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::config::JwtSecret;
use crate::transport;

/// Validates session tokens signed by a [`TokenIssuer`](super::TokenIssuer) holding
/// the same secret.
///
/// Only HS256 is accepted. The signature is checked before the expiry, so a forged
/// token is reported as invalid even when its expiry has passed.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &JwtSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token string, from a cookie or an already stripped header.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed into the expected claims
    /// * `InvalidToken` - Signature mismatch or unexpected algorithm
    /// * `TokenExpired` - Expiry is at or before the current time
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a raw token string as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let error = map_decode_error(e);
                tracing::debug!(error = %error, "Session token rejected");
                error
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            tracing::debug!(
                user_id = %claims.user_id(),
                expires_at = claims.expires_at(),
                "Session token expired"
            );
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }

    /// Verify the value of an `Authorization` header carrying a bearer token.
    ///
    /// # Errors
    /// * `Malformed` - Header does not start with the `Bearer ` scheme
    /// * Any error of [`verify`](Self::verify)
    pub fn verify_bearer(&self, header_value: &str) -> Result<Claims, JwtError> {
        self.verify(transport::bearer_token(header_value)?)
    }
}

fn map_decode_error(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidToken("signature mismatch".to_string()),
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            JwtError::InvalidToken("unexpected signing algorithm".to_string())
        }
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => JwtError::Malformed(error.to_string()),
        _ => JwtError::InvalidToken(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Duration;
    use chrono::TimeZone;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;

    use super::*;
    use crate::jwt::TokenIssuer;
    use crate::user::Role;
    use crate::user::UserId;

    const SECRET: &str = "my_secret_key_at_least_32_bytes_long!";

    fn secret() -> JwtSecret {
        JwtSecret::new(SECRET).unwrap()
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn sample_claims() -> Claims {
        Claims::new(UserId(42), "a@x.com", Role::General)
    }

    fn issue(claims: Claims) -> String {
        TokenIssuer::new(&secret())
            .issue_at(claims, issued_at())
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_round_trip() {
        let verifier = TokenVerifier::new(&secret());
        let token = issue(sample_claims());

        let decoded = verifier
            .verify_at(&token, issued_at() + Duration::minutes(5))
            .expect("Failed to verify token");

        let expected_exp = (issued_at() + Duration::hours(1)).timestamp();
        assert_eq!(decoded, sample_claims().with_expiration(expected_exp));
    }

    #[test]
    fn test_verify_with_system_clock() {
        let issuer = TokenIssuer::new(&secret());
        let verifier = TokenVerifier::new(&secret());

        let token = issuer.issue(sample_claims()).unwrap();
        let decoded = verifier.verify(token.as_str()).expect("Failed to verify token");

        assert_eq!(decoded.email(), "a@x.com");
    }

    #[test]
    fn test_expiry_boundary() {
        let verifier = TokenVerifier::new(&secret());
        let token = issue(sample_claims());
        let expiry = issued_at() + Duration::hours(1);

        assert!(verifier
            .verify_at(&token, expiry - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            verifier.verify_at(&token, expiry),
            Err(JwtError::TokenExpired)
        );
        assert_eq!(
            verifier.verify_at(&token, expiry + Duration::days(1)),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_flipped_signature_bits_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let token = issue(sample_claims());
        let (message, signature) = token.rsplit_once('.').unwrap();
        let signature_bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for byte in 0..signature_bytes.len() {
            for bit in 0..8 {
                let mut tampered = signature_bytes.clone();
                tampered[byte] ^= 1 << bit;
                let forged = format!("{}.{}", message, URL_SAFE_NO_PAD.encode(&tampered));

                let result = verifier.verify_at(&forged, issued_at());
                assert!(
                    matches!(result, Err(JwtError::InvalidToken(_))),
                    "byte {} bit {} accepted: {:?}",
                    byte,
                    bit,
                    result
                );
            }
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let token = issue(sample_claims());
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = sample_claims()
            .with_expiration((issued_at() + Duration::hours(1)).timestamp());
        let mut forged_payload = serde_json::to_value(&forged_claims).unwrap();
        forged_payload["role"] = serde_json::json!("admin");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged_payload.to_string()),
            parts[2]
        );

        assert!(matches!(
            verifier.verify_at(&forged, issued_at()),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_forged_expired_token_reports_invalid_signature() {
        let verifier = TokenVerifier::new(&secret());
        let other = JwtSecret::new("secret2_at_least_32_bytes_long_key!").unwrap();
        let token = TokenIssuer::new(&other)
            .issue_at(sample_claims(), issued_at())
            .unwrap();

        let result = verifier.verify_at(token.as_str(), issued_at() + Duration::days(2));
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let claims = sample_claims().with_expiration(issued_at().timestamp() + 3600);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify_at(&token, issued_at()),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let claims = sample_claims().with_expiration(issued_at().timestamp() + 3600);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let token = format!("{}.{}.", header, payload);

        let result = verifier.verify_at(&token, issued_at());
        assert!(result.is_err());
        assert!(!matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_malformed_tokens() {
        let verifier = TokenVerifier::new(&secret());

        for token in ["", "not-a-token", "invalid.token.here", "a.b"] {
            assert!(
                matches!(
                    verifier.verify_at(token, issued_at()),
                    Err(JwtError::Malformed(_))
                ),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_unknown_claim_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let payload = serde_json::json!({
            "sub": 42,
            "email": "a@x.com",
            "role": "general",
            "exp": issued_at().timestamp() + 3600,
            "scope": "everything"
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify_at(&token, issued_at()),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let verifier = TokenVerifier::new(&secret());
        let payload = serde_json::json!({"sub": 42, "email": "a@x.com", "role": "general"});
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verifier.verify_at(&token, issued_at()),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_verify_bearer() {
        let issuer = TokenIssuer::new(&secret());
        let verifier = TokenVerifier::new(&secret());
        let token = issuer.issue(sample_claims()).unwrap();

        let claims = verifier
            .verify_bearer(&format!("Bearer {}", token.as_str()))
            .expect("Failed to verify bearer header");
        assert_eq!(claims.user_id(), UserId(42));

        assert!(matches!(
            verifier.verify_bearer(token.as_str()),
            Err(JwtError::Malformed(_))
        ));
    }
}
