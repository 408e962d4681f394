use crate::ProfileUpdateData;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One durable, not yet acknowledged profile mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSave {
    pub id: String,
    pub data: ProfileUpdateData,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default)]
    pub retry_count: u32,
}

impl PendingSave {
    pub fn new(data: ProfileUpdateData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data,
            timestamp: chrono::Utc::now().timestamp_millis(),
            retry_count: 0,
        }
    }

    /// Newest entry by timestamp; ties go to the one appended last.
    pub fn newest(saves: &[PendingSave]) -> Option<&PendingSave> {
        saves.iter().max_by_key(|save| save.timestamp)
    }
}
