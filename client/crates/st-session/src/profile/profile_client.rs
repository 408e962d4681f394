use crate::{ClientResult, ProfileSync, ProfileUpdateData, SessionManager, UserProfile};

use async_trait::async_trait;
use log::info;
use reqwest::Method;
use serde_json::Value;

const PROFILE_ENDPOINT: &str = "/api/profile";
const NOT_FOUND: u16 = 404;

/// Authenticated access to `/api/profile`
#[derive(Clone)]
pub struct ProfileClient {
    session: SessionManager,
}

impl ProfileClient {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// `Ok(None)` when the account has no profile yet.
    pub async fn get_profile(&self) -> ClientResult<Option<UserProfile>> {
        match self.session.request(Method::GET, PROFILE_ENDPOINT, None).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.status() == Some(NOT_FOUND) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create or replace the profile with `data`.
    pub async fn save_profile(&self, data: &ProfileUpdateData) -> ClientResult<UserProfile> {
        data.validate()?;
        let body = serde_json::to_value(data)?;
        let value = self
            .session
            .request(Method::POST, PROFILE_ENDPOINT, Some(&body))
            .await?;
        let profile: UserProfile = serde_json::from_value(value)?;
        info!("Profile saved (version {})", profile.version);
        Ok(profile)
    }

    pub async fn delete_profile(&self) -> ClientResult<()> {
        self.session
            .request(Method::DELETE, PROFILE_ENDPOINT, None)
            .await
            .map(|_: Value| ())
    }
}

#[async_trait]
impl ProfileSync for ProfileClient {
    async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    async fn push_profile(&self, data: &ProfileUpdateData) -> ClientResult<()> {
        self.save_profile(data).await.map(|_| ())
    }
}
