//! JWT token encoding and decoding using HS256.
//!
//! The token carries the numeric user id and the user type, which decide
//! whose profile is read and whether the charts view may be opened.

use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// Regular user
pub const USER_TYPE_USER: u8 = 1;
/// Administrator
pub const USER_TYPE_ADMIN: u8 = 2;
/// Super administrator
pub const USER_TYPE_SUPER_ADMIN: u8 = 3;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: numeric user id
    pub sub: String,
    /// One of the `USER_TYPE_*` constants
    pub user_type: u8,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Encode a JWT token for the given user.
///
/// Uses HS256 signing with the provided secret.
pub fn encode_jwt(user_id: u64, user_type: u8, secret: &str, expiry_secs: u64) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        user_type,
        iat: now,
        exp: now + expiry_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")
}

/// Decode and validate a JWT token.
///
/// Returns the claims if the token is valid, not expired, and
/// signed with the correct secret.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data: TokenData<Claims> = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

    #[test]
    fn test_encode_decode_roundtrip() {
        let token = encode_jwt(42, USER_TYPE_ADMIN, TEST_SECRET, 3600).expect("encode should succeed");

        let claims = decode_jwt(&token, TEST_SECRET).expect("decode should succeed");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_type, USER_TYPE_ADMIN);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "7".to_string(),
            user_type: USER_TYPE_USER,
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode should succeed");

        assert!(decode_jwt(&token, TEST_SECRET).is_err(), "expired token should be rejected");
    }

    #[test]
    fn test_invalid_secret_rejected() {
        let token = encode_jwt(1, USER_TYPE_USER, TEST_SECRET, 3600).expect("encode should succeed");

        let result = decode_jwt(&token, "wrong-secret-that-is-also-32chars!");
        assert!(result.is_err(), "wrong secret should be rejected");
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(decode_jwt("not.a.valid.jwt", TEST_SECRET).is_err());
        assert!(decode_jwt("", TEST_SECRET).is_err());
        assert!(decode_jwt("just-random-text", TEST_SECRET).is_err());
    }
}
