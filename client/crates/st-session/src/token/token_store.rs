use crate::{AUTH_TOKENS_KEY, ClientResult, KeyValueStore, TokenPair};

use std::sync::Arc;

use log::{debug, warn};

/// Typed access to the stored [`TokenPair`].
#[derive(Clone)]
pub(crate) struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// An unreadable value is quarantined and reported as absent.
    pub(crate) async fn load(&self) -> ClientResult<Option<TokenPair>> {
        let Some(raw) = self.store.get(AUTH_TOKENS_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<TokenPair>(&raw) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                warn!("Stored credentials unreadable, discarding: {e}");
                self.store.quarantine(AUTH_TOKENS_KEY).await?;
                Ok(None)
            }
        }
    }

    pub(crate) async fn save(&self, pair: &TokenPair) -> ClientResult<()> {
        let raw = serde_json::to_string(pair)?;
        self.store.set(AUTH_TOKENS_KEY, &raw).await?;
        debug!("Credentials stored");
        Ok(())
    }

    pub(crate) async fn clear(&self) -> ClientResult<()> {
        self.store.remove(AUTH_TOKENS_KEY).await?;
        debug!("Credentials cleared");
        Ok(())
    }
}
