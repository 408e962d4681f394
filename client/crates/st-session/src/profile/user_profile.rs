use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile as stored by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub nickname: String,
    pub avatar_type: String,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub notifications: Map<String, Value>,
    #[serde(default)]
    pub schedule: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default = "initial_version")]
    pub version: i64,
}

fn initial_version() -> i64 {
    1
}
