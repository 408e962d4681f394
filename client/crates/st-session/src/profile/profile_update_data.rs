use crate::{ClientError, ClientResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Counted in UTF-16 code units, as the gateway measures it.
const MAX_NICKNAME_CHARS: usize = 20;
const AVATAR_TYPES: [&str; 2] = ["boy", "girl"];

/// Full profile snapshot sent by `POST /api/profile`.
///
/// Always the complete profile: a newer snapshot replaces an older one
/// outright, nothing is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateData {
    pub nickname: String,
    pub avatar_type: String,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub notifications: Map<String, Value>,
    #[serde(default)]
    pub schedule: Map<String, Value>,
}

impl ProfileUpdateData {
    /// Reject snapshots the gateway is certain to refuse.
    pub fn validate(&self) -> ClientResult<()> {
        let nickname = self.nickname.trim();
        if nickname.is_empty() {
            return Err(ClientError::validation("nickname", "must not be blank"));
        }
        if nickname.encode_utf16().count() > MAX_NICKNAME_CHARS {
            return Err(ClientError::validation(
                "nickname",
                format!("must be at most {MAX_NICKNAME_CHARS} characters"),
            ));
        }

        if !AVATAR_TYPES.contains(&self.avatar_type.as_str()) {
            return Err(ClientError::validation(
                "avatarType",
                format!("must be one of {AVATAR_TYPES:?}, got '{}'", self.avatar_type),
            ));
        }

        if let Some(ref avatar_id) = self.avatar_id
            && avatar_id.trim().is_empty()
        {
            return Err(ClientError::validation("avatarId", "must not be blank when set"));
        }

        Ok(())
    }
}

impl From<crate::UserProfile> for ProfileUpdateData {
    fn from(profile: crate::UserProfile) -> Self {
        Self {
            nickname: profile.nickname,
            avatar_type: profile.avatar_type,
            avatar_id: profile.avatar_id,
            notifications: profile.notifications,
            schedule: profile.schedule,
        }
    }
}
