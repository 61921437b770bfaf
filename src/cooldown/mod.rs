//! Cooldown tracking for throttled user actions.
//!
//! Records the last time each logical action ran (`"resend-verification:
//! user@example.com"`, `"join:game-42"`) so screens can show a countdown
//! instead of firing the request again. The map is persisted best-effort;
//! a lost write only means a throttle resets after a process restart,
//! which is acceptable for a UX-only limit.

pub mod storage;

use crate::clock::epoch_millis;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storage::Storage;

/// Storage key the tracker persists under unless overridden.
pub const DEFAULT_STORE_KEY: &str = "cooldowns";

const RECORD_VERSION: u32 = 1;

/// Persisted record for the cooldown map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CooldownRecord {
    /// Schema version for the persisted record.
    #[serde(default)]
    version: u32,
    /// Action key to epoch-millisecond timestamp of the last send.
    #[serde(default)]
    entries: BTreeMap<String, u64>,
}

/// Tracks last-sent timestamps per action key with best-effort persistence.
///
/// Construct one per process, call [`Self::initialize`] before trusting
/// [`Self::remaining_seconds`], and keep it behind whatever sharing the
/// host uses — the tracker is `Clone` and clones share state.
///
/// [`Self::mark_sent`] must run inside a Tokio runtime: persistence is
/// spawned onto it.
#[derive(Clone)]
pub struct CooldownTracker {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<BTreeMap<String, u64>>,
    storage: Arc<dyn Storage>,
    store_key: String,
    ready: AtomicBool,
    failed_saves: AtomicU64,
    /// Serializes persisted writes so a stale snapshot cannot land last.
    save_lock: tokio::sync::Mutex<()>,
}

impl CooldownTracker {
    /// Tracker persisting under [`DEFAULT_STORE_KEY`].
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_store_key(storage, DEFAULT_STORE_KEY)
    }

    /// Tracker persisting under a caller-chosen store key.
    pub fn with_store_key(storage: Arc<dyn Storage>, store_key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(BTreeMap::new()),
                storage,
                store_key: store_key.into(),
                ready: AtomicBool::new(false),
                failed_saves: AtomicU64::new(0),
                save_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Load the persisted record and flip the readiness flag.
    ///
    /// Corrupt or missing data degrades to an empty map; this never fails.
    /// Callers that care whether the map is trustworthy yet check
    /// [`Self::is_ready`] rather than assuming immediate availability.
    pub async fn initialize(&self) {
        let record = match self.inner.storage.load(&self.inner.store_key).await {
            Ok(Some(text)) => serde_json::from_str::<CooldownRecord>(&text).unwrap_or_else(|err| {
                tracing::warn!(
                    store_key = %self.inner.store_key,
                    error = %err,
                    "corrupt cooldown record, starting empty"
                );
                CooldownRecord::default()
            }),
            Ok(None) => CooldownRecord::default(),
            Err(err) => {
                tracing::warn!(
                    store_key = %self.inner.store_key,
                    error = %err,
                    "cooldown record unreadable, starting empty"
                );
                CooldownRecord::default()
            }
        };
        *self.inner.entries() = record.entries;
        self.inner.ready.store(true, Ordering::Release);
    }

    /// True once the initial load has completed.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    /// Record that `key` was performed at `at` (default: now, epoch ms).
    ///
    /// Overwrites any prior value, including with an explicitly older
    /// timestamp — last write wins. Kicks off a background best-effort
    /// save of the whole record; the caller never observes persistence
    /// failures.
    pub fn mark_sent(&self, key: &str, at: Option<u64>) {
        let at = at.unwrap_or_else(epoch_millis);
        self.inner.entries().insert(key.to_string(), at);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.persist().await;
        });
    }

    /// Whole seconds left before `key` may run again, for a required
    /// cooldown of `interval_ms`. A never-marked key is immediately ready.
    pub fn remaining_seconds(&self, key: &str, interval_ms: u64) -> u64 {
        self.remaining_seconds_at(key, interval_ms, epoch_millis())
    }

    fn remaining_seconds_at(&self, key: &str, interval_ms: u64, now_ms: u64) -> u64 {
        let Some(last) = self.inner.entries().get(key).copied() else {
            return 0;
        };
        let elapsed = now_ms.saturating_sub(last);
        let remaining = interval_ms.saturating_sub(elapsed);
        remaining.saturating_add(999) / 1000
    }

    /// Persist the current record in the foreground, same swallow-and-count
    /// contract as the background saves. For shutdown paths and tests.
    pub async fn flush(&self) {
        self.inner.persist().await;
    }

    /// Number of persistence attempts that failed since construction.
    ///
    /// Failures are never surfaced to callers; this counter is the
    /// operator-facing signal that the storage backend is unhealthy.
    pub fn failed_saves(&self) -> u64 {
        self.inner.failed_saves.load(Ordering::Relaxed)
    }
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, u64>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self) {
        // Snapshot after taking the save lock so the last completed save
        // always carries the newest state.
        let _guard = self.save_lock.lock().await;
        let record = CooldownRecord {
            version: RECORD_VERSION,
            entries: self.entries().clone(),
        };
        let text = match serde_json::to_string(&record) {
            Ok(text) => text,
            Err(err) => {
                self.note_save_failure(&StoreError::Json(err));
                return;
            }
        };
        if let Err(err) = self.storage.save(&self.store_key, &text).await {
            self.note_save_failure(&err);
        }
    }

    fn note_save_failure(&self, err: &StoreError) {
        self.failed_saves.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            store_key = %self.store_key,
            error = %err,
            "cooldown persistence failed"
        );
    }
}
