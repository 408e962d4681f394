use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account summary returned by a provider sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub provider: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    /// Passed through as sent; the gateway's timestamp encoding is not fixed.
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}
