//! Authentication utilities

use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_LENGTH: usize = 32;

/// Access tokens live for 30 days
pub const ACCESS_TOKEN_TTL: u64 = 30 * 24 * 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub exp: usize,
    #[serde(default)]
    pub token_type: String,
}

/// hash a password using pbkdf2-sha256 with the given salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut hash,
    );

    hex::encode(hash)
}

/// verify a password against a hash using constant-time comparison
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    let computed = hash_password(password, salt);
    computed.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// create jwt token with token type and ttl seconds
pub fn create_jwt(user_id: i64, secret: &str, token_type: &str, expires_in: u64) -> Result<String> {
    let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + expires_in;

    let claims = Claims {
        sub: user_id,
        exp: expiration as usize,
        token_type: token_type.to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// verify jwt token and optionally enforce token type
pub fn verify_jwt(token: &str, secret: &str, expected_type: Option<&str>) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.sub = None;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    let claims = token_data.claims;
    if let Some(t) = expected_type {
        if !claims.token_type.is_empty() && claims.token_type != t {
            return Err(anyhow::anyhow!("Invalid token type"));
        }
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2", "server-salt");
        assert!(verify_password("hunter2", "server-salt", &hash));
        assert!(!verify_password("hunter3", "server-salt", &hash));
        assert!(!verify_password("hunter2", "other-salt", &hash));
    }

    #[test]
    fn test_jwt_round_trip() {
        let token = create_jwt(7, "secret", "access", 3600).unwrap();
        let claims = verify_jwt(&token, "secret", Some("access")).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let token = create_jwt(7, "secret", "access", 3600).unwrap();
        assert!(verify_jwt(&token, "other", Some("access")).is_err());
    }

    #[test]
    fn test_jwt_rejects_wrong_type() {
        let token = create_jwt(7, "secret", "refresh", 3600).unwrap();
        assert!(verify_jwt(&token, "secret", Some("access")).is_err());
    }
}
