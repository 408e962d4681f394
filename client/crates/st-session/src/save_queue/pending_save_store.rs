use crate::{ClientResult, KeyValueStore, PENDING_SAVES_KEY, PendingSave};

use std::sync::Arc;

use log::warn;
use tokio::sync::Mutex;

/// Serialized read-modify-write access to the durable pending list
pub(crate) struct PendingSaveStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl PendingSaveStore {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) async fn load(&self) -> ClientResult<Vec<PendingSave>> {
        let _guard = self.write_lock.lock().await;
        self.read().await
    }

    /// Apply `change` to the stored list and persist the result.
    pub(crate) async fn update<F, R>(&self, change: F) -> ClientResult<R>
    where
        F: FnOnce(&mut Vec<PendingSave>) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut saves = self.read().await?;
        let result = change(&mut saves);

        if saves.is_empty() {
            self.store.remove(PENDING_SAVES_KEY).await?;
        } else {
            let raw = serde_json::to_string(&saves)?;
            self.store.set(PENDING_SAVES_KEY, &raw).await?;
        }

        Ok(result)
    }

    // Caller holds `write_lock`.
    async fn read(&self) -> ClientResult<Vec<PendingSave>> {
        let Some(raw) = self.store.get(PENDING_SAVES_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(saves) => Ok(saves),
            Err(e) => {
                warn!("Pending profile saves unreadable, starting empty: {e}");
                self.store.quarantine(PENDING_SAVES_KEY).await?;
                Ok(Vec::new())
            }
        }
    }
}
