use actix_web::http::header;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while validating a session token
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Validates bearer JWTs issued by the external auth service
///
/// Session issuance lives outside this service; we only verify the HS256
/// signature and expiry and extract the subject (user id).
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a raw token and return the authenticated user id
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims.sub)
    }

    /// Extract and verify the bearer token from a request
    pub fn authenticate(&self, req: &HttpRequest) -> Result<String, SessionError> {
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(SessionError::MissingToken)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(SessionError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn issue_token(secret: &str, sub: &str, exp: usize) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let verifier = SessionVerifier::new("test-secret");
        let token = issue_token("test-secret", "user_42", 4_102_444_800);

        assert_eq!(verifier.verify(&token).unwrap(), "user_42");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = SessionVerifier::new("test-secret");
        let token = issue_token("other-secret", "user_42", 4_102_444_800);

        assert!(matches!(
            verifier.verify(&token),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = SessionVerifier::new("test-secret");
        let token = issue_token("test-secret", "user_42", 1_000_000);

        assert!(verifier.verify(&token).is_err());
    }
}
