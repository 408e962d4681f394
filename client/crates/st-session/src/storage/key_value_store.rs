use crate::ClientResult;

use async_trait::async_trait;

/// Platform key-value store holding whole serialized values.
///
/// Writes replace the entire value for a key; there are no transactions.
/// Callers that read-modify-write must serialize themselves.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    async fn remove(&self, key: &str) -> ClientResult<()>;

    /// Move an unreadable value out of the way.
    ///
    /// Stores that can keep a copy for debugging should do so; the default
    /// simply removes the key.
    async fn quarantine(&self, key: &str) -> ClientResult<()> {
        self.remove(key).await
    }
}
