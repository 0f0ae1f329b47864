use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user email)
    pub exp: i64,    // expiration time
}

/// Result of verifying a token. Verification failure is a normal outcome,
/// not an error: bad signature, malformed payload and expiry all yield
/// `valid = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub valid: bool,
    pub subject: Option<String>,
}

impl Verification {
    fn invalid() -> Self {
        Self {
            valid: false,
            subject: None,
        }
    }
}

/// Issues and verifies signed, time-bound credentials.
///
/// Uses a single process-wide secret and a single fixed algorithm (HS256);
/// the secret is never per-request.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a signed token for `subject`, valid for `ttl_minutes`
    pub fn issue(&self, subject: &str, ttl_minutes: i64) -> Result<String> {
        let exp = Utc::now() + Duration::minutes(ttl_minutes);
        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode JWT token")
    }

    /// Decode and check signature and expiry. Never propagates a fault:
    /// any structural failure yields `valid = false`.
    pub fn verify(&self, token: &str) -> Verification {
        // Zero leeway keeps expiry monotonic: any check strictly after the
        // expiry instant reports invalid
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Verification {
                valid: true,
                subject: Some(data.claims.sub),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                Verification::invalid()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_returns_subject_for_fresh_token() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue("alice@example.com", 60).unwrap();

        let result = tokens.verify(&token);
        assert!(result.valid);
        assert_eq!(result.subject.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");

        let token = issuer.issue("alice@example.com", 60).unwrap();
        let result = verifier.verify(&token);
        assert!(!result.valid);
        assert!(result.subject.is_none());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let tokens = TokenService::new("test-secret");

        // Encode claims whose expiry is already in the past
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            exp: (Utc::now() - Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let result = tokens.verify(&token);
        assert!(!result.valid);
    }

    #[test]
    fn verify_rejects_garbage() {
        let tokens = TokenService::new("test-secret");
        assert!(!tokens.verify("not-a-jwt").valid);
        assert!(!tokens.verify("").valid);
        assert!(!tokens.verify("abc.def.ghi").valid);
    }
}
