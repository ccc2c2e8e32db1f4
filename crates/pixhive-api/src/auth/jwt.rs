//! HS256 access-token issuance and verification.

use crate::auth::models::JwtClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pixhive_core::{AppError, User};

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a token for a user.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let claims = JwtClaims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token expired".to_string())
                }
                _ => AppError::Unauthorized("Invalid token".to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixhive_core::UserRole;

    fn service() -> JwtService {
        JwtService::new("test-secret-test-secret-test-secret", 24)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let user = User::new("a@b.com".to_string(), None);
        let token = service().issue(&user).unwrap();

        let claims = service().verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let user = User::new("a@b.com".to_string(), None);
        let token = service().issue(&user).unwrap();

        let other = JwtService::new("another-secret-another-secret-xx", 24);
        let result = other.verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let result = service().verify("not.a.token");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let expired = JwtService::new("test-secret-test-secret-test-secret", -1);
        let user = User::new("a@b.com".to_string(), None);
        let token = expired.issue(&user).unwrap();

        let result = service().verify(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(msg)) if msg.contains("expired")));
    }
}
