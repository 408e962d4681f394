//! Client-side session core for the storyteller app.
//!
//! Two cooperating services live here:
//!
//! - [`SessionManager`] owns the access/refresh token pair, refreshes it
//!   before it expires (at most one refresh in flight), and retries a request
//!   exactly once when the gateway rejects a token with 401.
//! - [`SaveQueue`] makes a profile mutation durable across restarts and
//!   flushes it with exponential backoff, sending only the newest snapshot.
//!
//! [`SessionContext`] wires both from a loaded [`st_config::Config`].

pub(crate) mod api;
pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod profile;
pub(crate) mod save_queue;
pub(crate) mod session;
pub(crate) mod storage;
pub(crate) mod token;

#[cfg(test)]
mod tests;

pub use api::{ApiClient, ClientIdentity};
pub use context::SessionContext;
pub use error::{ClientError, Result as ClientResult};
pub use profile::{ProfileClient, ProfileUpdateData, UserProfile};
pub use save_queue::{
    IsRetryable, PendingSave, ProfileSync, RetryPolicy, SaveQueue, SaveQueueEvent, retry_delay,
};
pub use session::{AuthProvider, SessionManager, UserInfo};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token::{AccessClaims, TokenPair};

pub use reqwest::Method;

/// Secure-storage key holding the serialized [`TokenPair`]
pub const AUTH_TOKENS_KEY: &str = "auth_tokens";
/// Durable-storage key holding the serialized list of [`PendingSave`]s
pub const PENDING_SAVES_KEY: &str = "pending_profile_saves";
