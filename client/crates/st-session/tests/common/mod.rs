#![allow(dead_code)]

pub mod jwt_helper;

use st_session::{
    AUTH_TOKENS_KEY, ApiClient, ClientIdentity, KeyValueStore, MemoryStore, SessionManager,
    TokenPair,
};

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

pub use jwt_helper::{create_malformed_token, create_token_expiring_in};

pub const TEST_DEVICE_ID: &str = "device-test-1";
pub const TEST_PLATFORM: &str = "linux";
pub const TEST_VERSION: &str = "9.9.9";
pub const REFRESH_BUFFER: Duration = Duration::from_secs(300);

pub fn test_identity() -> ClientIdentity {
    ClientIdentity::new(TEST_PLATFORM, TEST_VERSION, TEST_DEVICE_ID)
}

pub fn test_api(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, test_identity(), Duration::from_secs(5))
}

/// Session manager over an in-memory store, optionally seeded with a pair.
pub async fn create_session(
    base_url: &str,
    seeded: Option<TokenPair>,
) -> (SessionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    if let Some(pair) = seeded {
        store
            .set(AUTH_TOKENS_KEY, &serde_json::to_string(&pair).unwrap())
            .await
            .unwrap();
    }
    let session = SessionManager::new(test_api(base_url), store.clone(), REFRESH_BUFFER);
    (session, store)
}

pub async fn stored_pair(store: &MemoryStore) -> Option<TokenPair> {
    store
        .get(AUTH_TOKENS_KEY)
        .await
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

/// Gateway body for a successful refresh or sign-in
pub fn auth_success_body(access: &str, refresh: &str) -> Value {
    json!({
        "success": true,
        "tokens": {
            "accessToken": access,
            "refreshToken": refresh,
            "tokenType": "Bearer",
            "expiresIn": 3600
        },
        "message": "Token refreshed"
    })
}

pub fn gateway_error_body(code: &str, message: &str) -> Value {
    json!({
        "success": false,
        "errorCode": code,
        "error": "Error",
        "message": message,
        "path": "/auth/refresh",
        "timestamp": "2026-01-01T00:00:00Z",
        "requestId": "req-1"
    })
}

pub fn profile_body(nickname: &str, version: i64) -> Value {
    json!({
        "userId": "user-1",
        "nickname": nickname,
        "avatarType": "boy",
        "avatarId": "avatar-1",
        "notifications": { "bedtime": true },
        "schedule": { "bedtime": "19:00" },
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-02T00:00:00Z",
        "version": version
    })
}
