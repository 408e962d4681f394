use crate::{ClientResult, ProfileUpdateData};

use async_trait::async_trait;

/// Where the save queue delivers profile snapshots
#[async_trait]
pub trait ProfileSync: Send + Sync {
    /// Local check only; must not hit the network.
    async fn is_authenticated(&self) -> bool;

    async fn push_profile(&self, data: &ProfileUpdateData) -> ClientResult<()>;
}
