mod backoff;
mod pending_save;
mod pending_save_store;
mod profile_sync;
mod save_queue;
mod save_queue_event;

pub use backoff::{IsRetryable, RetryPolicy, retry_delay};
pub use pending_save::PendingSave;
pub use profile_sync::ProfileSync;
pub use save_queue::SaveQueue;
pub use save_queue_event::SaveQueueEvent;

pub(crate) use pending_save_store::PendingSaveStore;
