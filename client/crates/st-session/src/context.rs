use crate::{
    ApiClient, ClientIdentity, ClientResult, FileStore, KeyValueStore, ProfileClient, RetryPolicy,
    SaveQueue, SessionManager,
};

use std::sync::Arc;
use std::time::Duration;

use log::info;
use st_config::Config;

/// Session manager, profile client and save queue wired to shared storage.
///
/// Construct once per process and pass clones to whoever needs them.
#[derive(Clone)]
pub struct SessionContext {
    pub session: SessionManager,
    pub profiles: ProfileClient,
    pub save_queue: SaveQueue,
}

impl SessionContext {
    /// Wire everything from explicit parts.
    ///
    /// `secure` holds credentials; `durable` holds the pending save list.
    /// Both may be the same store.
    pub fn new(
        api: ApiClient,
        secure: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
        refresh_buffer: Duration,
        policy: RetryPolicy,
    ) -> Self {
        let session = SessionManager::new(api, secure, refresh_buffer);
        let profiles = ProfileClient::new(session.clone());
        let save_queue = SaveQueue::new(Arc::new(profiles.clone()), durable, policy);

        Self {
            session,
            profiles,
            save_queue,
        }
    }

    /// Wire everything from a loaded and validated [`Config`].
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let storage_path = config.storage_path()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&storage_path)?);

        let identity = ClientIdentity::new(
            &config.client.platform,
            &config.client.version,
            config.device_id()?,
        );
        let api = ApiClient::new(&config.api.base_url, identity, config.api.timeout());

        info!("Session storage at {}", storage_path.display());

        Ok(Self::new(
            api,
            Arc::clone(&store),
            store,
            config.session.refresh_buffer(),
            RetryPolicy::from(&config.save_queue),
        ))
    }
}
