use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// The client never checks signatures; any secret will do.
const TEST_JWT_SECRET: &[u8] = b"gateway-test-secret";

#[derive(Debug, Serialize, Deserialize)]
pub struct TestAccessClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub provider: String,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

/// Access token whose `exp` is `seconds` from now (negative for expired).
pub fn create_token_expiring_in(user_id: &str, seconds: i64) -> String {
    let now = now();
    let claims = TestAccessClaims {
        sub: user_id.to_string(),
        exp: now + seconds,
        iat: now,
        provider: String::from("google"),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}

pub fn create_malformed_token() -> String {
    "not-a-jwt".to_string()
}
