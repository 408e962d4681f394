use crate::save_queue::PendingSaveStore;
use crate::{
    ClientResult, IsRetryable, KeyValueStore, PendingSave, ProfileSync, ProfileUpdateData,
    RetryPolicy, SaveQueueEvent,
};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Durable queue of profile snapshots waiting to reach the server.
///
/// Only the newest snapshot is ever sent; older ones are dropped once it is
/// accepted or abandoned. Clones share the same queue.
///
/// Saves queued back to back from one task coalesce into a single send: the
/// background pass yields before its first read, so on a current-thread
/// runtime it always sees both entries. On a multi-thread runtime the pass
/// may start on another worker before the second save is appended; the
/// older snapshot is then sent first and the newer one right after, so the
/// server still ends on the newest data.
#[derive(Clone)]
pub struct SaveQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    sync: Arc<dyn ProfileSync>,
    saves: PendingSaveStore,
    policy: RetryPolicy,
    processing: AtomicBool,
    retry_timer: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<SaveQueueEvent>,
}

/// Why a processing pass stopped
enum PassEnd {
    /// Nothing left to send
    Drained,
    /// Waiting for the user to log in again
    Deferred,
    /// Last attempt failed; try again after the delay
    RetryAfter(Duration),
}

/// Clears the processing flag however the pass ends
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SaveQueue {
    pub fn new(sync: Arc<dyn ProfileSync>, store: Arc<dyn KeyValueStore>, policy: RetryPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(QueueInner {
                sync,
                saves: PendingSaveStore::new(store),
                policy,
                processing: AtomicBool::new(false),
                retry_timer: Mutex::new(None),
                events,
            }),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.inner.policy
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveQueueEvent> {
        self.inner.events.subscribe()
    }

    /// Persist `data` and start sending it in the background.
    ///
    /// Returns the new entry's id as soon as it is durable.
    pub async fn queue_profile_save(&self, data: ProfileUpdateData) -> ClientResult<String> {
        data.validate()?;

        let save = PendingSave::new(data);
        let id = save.id.clone();
        let queued = self
            .inner
            .saves
            .update(|saves| {
                saves.push(save);
                saves.len()
            })
            .await?;

        info!("Queued profile save {id} ({queued} pending)");
        spawn_processor(&self.inner);
        Ok(id)
    }

    pub async fn has_pending_saves(&self) -> ClientResult<bool> {
        Ok(!self.inner.saves.load().await?.is_empty())
    }

    pub async fn pending_saves(&self) -> ClientResult<Vec<PendingSave>> {
        self.inner.saves.load().await
    }

    /// Skip any scheduled backoff and run a processing pass now.
    ///
    /// Returns once the pass ends; a no-op if one is already running.
    pub async fn retry_pending_saves(&self) -> ClientResult<()> {
        self.cancel_pending_retries();
        process(&self.inner).await
    }

    /// Abort the scheduled backoff timer. Stored entries are untouched.
    pub fn cancel_pending_retries(&self) {
        if let Some(timer) = self.inner.take_timer() {
            timer.abort();
            debug!("Cancelled scheduled profile save retry");
        }
    }
}

impl QueueInner {
    fn take_timer(&self) -> Option<JoinHandle<()>> {
        self.retry_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn replace_timer(&self, timer: JoinHandle<()>) -> Option<JoinHandle<()>> {
        self.retry_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(timer)
    }

    fn emit(&self, event: SaveQueueEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Send the newest entry until the list is empty or sending must pause.
    async fn run_pass(&self) -> ClientResult<PassEnd> {
        loop {
            let saves = self.saves.load().await?;
            let Some(newest) = PendingSave::newest(&saves).cloned() else {
                return Ok(PassEnd::Drained);
            };
            let snapshot: HashSet<String> = saves.iter().map(|save| save.id.clone()).collect();

            if !self.sync.is_authenticated().await {
                debug!("Profile save {} waiting for login", newest.id);
                self.emit(SaveQueueEvent::Deferred {
                    id: newest.id,
                    reason: String::from("not authenticated"),
                });
                return Ok(PassEnd::Deferred);
            }

            let error = match self.sync.push_profile(&newest.data).await {
                Ok(()) => {
                    let removed = self.remove_all(&snapshot).await?;
                    let superseded = removed.saturating_sub(1);
                    info!("Profile save {} synced ({superseded} superseded)", newest.id);
                    self.emit(SaveQueueEvent::Synced {
                        id: newest.id,
                        superseded,
                    });
                    continue;
                }
                Err(e) if !e.is_retryable() => {
                    info!("Profile save {} waiting for login: {e}", newest.id);
                    self.emit(SaveQueueEvent::Deferred {
                        id: newest.id,
                        reason: e.to_string(),
                    });
                    return Ok(PassEnd::Deferred);
                }
                Err(e) => e,
            };

            let retry_count = self
                .saves
                .update(|saves| {
                    saves
                        .iter_mut()
                        .find(|save| save.id == newest.id)
                        .map(|save| {
                            save.retry_count += 1;
                            save.retry_count
                        })
                })
                .await?;

            let Some(retry_count) = retry_count else {
                // Removed while the push was in flight.
                continue;
            };

            if self.policy.is_exhausted(retry_count) {
                self.remove_all(&snapshot).await?;
                warn!(
                    "Abandoning profile save {} after {retry_count} failed attempts: {error}",
                    newest.id
                );
                self.emit(SaveQueueEvent::Abandoned {
                    id: newest.id,
                    retry_count,
                    error: error.to_string(),
                });
                continue;
            }

            let delay = self.policy.delay_for(retry_count);
            info!(
                "Profile save {} failed (attempt {retry_count}), retrying in {delay:?}: {error}",
                newest.id
            );
            self.emit(SaveQueueEvent::RetryScheduled {
                id: newest.id,
                retry_count,
                delay,
            });
            return Ok(PassEnd::RetryAfter(delay));
        }
    }

    /// Removes every entry named in `ids`; returns how many were removed.
    async fn remove_all(&self, ids: &HashSet<String>) -> ClientResult<usize> {
        self.saves
            .update(|saves| {
                let before = saves.len();
                saves.retain(|save| !ids.contains(&save.id));
                before - saves.len()
            })
            .await
    }
}

/// Run passes until the queue drains or has to wait. Single-flight per queue.
async fn process(inner: &Arc<QueueInner>) -> ClientResult<()> {
    loop {
        if inner.processing.swap(true, Ordering::AcqRel) {
            debug!("Profile save processing already running");
            return Ok(());
        }

        let outcome = {
            let _guard = ProcessingGuard(&inner.processing);
            inner.run_pass().await?
        };

        match outcome {
            PassEnd::Deferred => return Ok(()),
            PassEnd::RetryAfter(delay) => {
                schedule_retry(inner, delay);
                return Ok(());
            }
            PassEnd::Drained => {
                // An entry queued after the last load found the flag set.
                if inner.saves.load().await?.is_empty() {
                    return Ok(());
                }
            }
        }
    }
}

fn spawn_processor(inner: &Arc<QueueInner>) {
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        // Let a save queued right behind this one land first.
        tokio::task::yield_now().await;
        if let Err(e) = process(&inner).await {
            warn!("Profile save processing failed: {e}");
            inner.emit(SaveQueueEvent::Stalled {
                error: e.to_string(),
            });
        }
    });
}

fn schedule_retry(inner: &Arc<QueueInner>, delay: Duration) {
    let task_inner = Arc::clone(inner);
    let timer = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // Detach from the slot so a late cancel cannot abort this pass.
        drop(task_inner.take_timer());
        if let Err(e) = process(&task_inner).await {
            warn!("Profile save retry failed: {e}");
            task_inner.emit(SaveQueueEvent::Stalled {
                error: e.to_string(),
            });
        }
    });

    if let Some(previous) = inner.replace_timer(timer) {
        previous.abort();
    }
}
