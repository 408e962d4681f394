use std::time::Duration;

/// Outcome notifications published by [`crate::SaveQueue`].
///
/// Delivered on a broadcast channel; nobody is required to listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveQueueEvent {
    /// The server accepted `id`; `superseded` older entries were dropped with it.
    Synced { id: String, superseded: usize },
    /// `id` failed and will be sent again after `delay`.
    RetryScheduled {
        id: String,
        retry_count: u32,
        delay: Duration,
    },
    /// Sending is parked until the user is authenticated again.
    Deferred { id: String, reason: String },
    /// Retry ceiling reached; the mutation is permanently dropped.
    Abandoned {
        id: String,
        retry_count: u32,
        error: String,
    },
    /// A background pass stopped on a storage error. Entries stay queued
    /// until the next save or manual retry.
    Stalled { error: String },
}

impl SaveQueueEvent {
    /// Entry the event is about; `None` for queue-wide events.
    pub fn id(&self) -> Option<&str> {
        match self {
            SaveQueueEvent::Synced { id, .. }
            | SaveQueueEvent::RetryScheduled { id, .. }
            | SaveQueueEvent::Deferred { id, .. }
            | SaveQueueEvent::Abandoned { id, .. } => Some(id),
            SaveQueueEvent::Stalled { .. } => None,
        }
    }
}
