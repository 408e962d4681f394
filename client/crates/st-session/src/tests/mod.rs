mod api_client;

use crate::{ClientError, ClientResult, KeyValueStore, MemoryStore, ProfileSync, ProfileUpdateData};

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, json};
use tokio::sync::{Notify, Semaphore};
use tokio::time::Instant;

pub(crate) fn profile(nickname: &str) -> ProfileUpdateData {
    let mut notifications = Map::new();
    notifications.insert(String::from("bedtime"), json!(true));
    let mut schedule = Map::new();
    schedule.insert(String::from("bedtime"), json!("19:30"));

    ProfileUpdateData {
        nickname: nickname.to_string(),
        avatar_type: String::from("girl"),
        avatar_id: Some(String::from("avatar-3")),
        notifications,
        schedule,
    }
}

/// Scripted result of one push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    Accept,
    ServerError,
    Rejected,
}

impl PushOutcome {
    fn into_result(self) -> ClientResult<()> {
        match self {
            PushOutcome::Accept => Ok(()),
            PushOutcome::ServerError => Err(ClientError::api(503, "GTW-500", "unavailable")),
            PushOutcome::Rejected => Err(ClientError::authentication_failed("refresh rejected")),
        }
    }
}

/// In-memory [`ProfileSync`] recording every push
pub(crate) struct MockProfileSync {
    authenticated: AtomicBool,
    script: Mutex<VecDeque<PushOutcome>>,
    fallback: Mutex<PushOutcome>,
    pushes: Mutex<Vec<(ProfileUpdateData, Instant)>>,
    gate: Option<Semaphore>,
    push_started: Notify,
}

impl MockProfileSync {
    pub(crate) fn new(authenticated: bool, fallback: PushOutcome) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            pushes: Mutex::new(Vec::new()),
            gate: None,
            push_started: Notify::new(),
        }
    }

    /// Pushes block until `release` hands out permits.
    pub(crate) fn gated(authenticated: bool, fallback: PushOutcome) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(authenticated, fallback)
        }
    }

    pub(crate) fn script(&self, outcomes: &[PushOutcome]) {
        self.script.lock().unwrap().extend(outcomes.iter().copied());
    }

    pub(crate) fn set_fallback(&self, outcome: PushOutcome) {
        *self.fallback.lock().unwrap() = outcome;
    }

    pub(crate) fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    pub(crate) fn release(&self, permits: usize) {
        if let Some(ref gate) = self.gate {
            gate.add_permits(permits);
        }
    }

    pub(crate) async fn wait_for_push(&self) {
        self.push_started.notified().await;
    }

    pub(crate) fn pushed_nicknames(&self) -> Vec<String> {
        self.pushes
            .lock()
            .unwrap()
            .iter()
            .map(|(data, _)| data.nickname.clone())
            .collect()
    }

    pub(crate) fn push_times(&self) -> Vec<Instant> {
        self.pushes.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl ProfileSync for MockProfileSync {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn push_profile(&self, data: &ProfileUpdateData) -> ClientResult<()> {
        self.pushes
            .lock()
            .unwrap()
            .push((data.clone(), Instant::now()));
        self.push_started.notify_one();

        if let Some(ref gate) = self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let scripted = self.script.lock().unwrap().pop_front();
        let outcome = scripted.unwrap_or_else(|| *self.fallback.lock().unwrap());
        outcome.into_result()
    }
}

/// [`MemoryStore`] whose writes can be switched to fail
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> ClientResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::storage(key, "disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.check_writable(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.check_writable(key)?;
        self.inner.remove(key).await
    }
}
