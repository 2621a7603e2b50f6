//! The history ledger: process-wide list of completed operations.
//!
//! `HistoryLedger` is a cheap clonable handle. Every clone sees the same
//! entries, and only `append` and `clear` change them. Readers either
//! take a copy with `entries()` or subscribe to a `watch` channel that
//! receives every new list.
//!
//! The ledger starts in `Remote` mode when a `HistoryProvider` is
//! attached. A failed remote load or clear drops it to `LocalOnly` for
//! the rest of the session; it never switches back.
//!
//! # Example
//!
//! ```rust
//! use keycalc::core::Operator;
//! use keycalc::ledger::{HistoryLedger, MemorySnapshotStore};
//! use std::sync::Arc;
//!
//! let ledger = HistoryLedger::new(5, Arc::new(MemorySnapshotStore::new()));
//! let entry = ledger.append(Operator::Add, 5.0, Some(3.0), 8.0);
//!
//! assert_eq!(entry.expression, "5 + 3 = 8");
//! assert_eq!(ledger.last().map(|e| e.id), Some(1));
//! ```

mod error;
mod snapshot;

pub use error::SnapshotError;
pub use snapshot::{
    FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore, SNAPSHOT_VERSION,
};

use crate::core::{EntryList, HistoryEntry, Operator};
use crate::provider::{HistoryProvider, RemoteRecord};
use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Where the ledger keeps its source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerMode {
    /// A remote history provider is attached and reachable
    Remote,
    /// Only the local snapshot is used
    LocalOnly,
}

/// Where `load` found its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Snapshot,
    Empty,
}

#[derive(Debug)]
struct LedgerState {
    entries: EntryList,
    next_id: u64,
    mode: LedgerMode,
    /// Bumped on every change that must reach the snapshot.
    revision: u64,
}

/// Shared handle to the history ledger.
#[derive(Clone)]
pub struct HistoryLedger {
    state: Arc<Mutex<LedgerState>>,
    remote: Option<Arc<dyn HistoryProvider>>,
    store: Arc<dyn SnapshotStore>,
    /// Revision last written to `store`; serializes snapshot writes.
    written: Arc<Mutex<u64>>,
    updates: Arc<watch::Sender<Vec<HistoryEntry>>>,
}

impl HistoryLedger {
    /// Local-only ledger holding at most `limit` entries.
    pub fn new(limit: usize, store: Arc<dyn SnapshotStore>) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                entries: EntryList::new(limit),
                next_id: 1,
                mode: LedgerMode::LocalOnly,
                revision: 0,
            })),
            remote: None,
            store,
            written: Arc::new(Mutex::new(0)),
            updates: Arc::new(updates),
        }
    }

    /// Attach a remote history provider and switch to `Remote` mode.
    pub fn with_remote(mut self, remote: Arc<dyn HistoryProvider>) -> Self {
        self.state.lock().mode = LedgerMode::Remote;
        self.remote = Some(remote);
        self
    }

    /// Populate the ledger at startup.
    ///
    /// Tries the remote provider first, then the local snapshot, and
    /// otherwise starts empty. Remote records are renumbered with fresh
    /// ids; a successful remote load also rewrites the snapshot.
    pub async fn load(&self) -> LoadSource {
        if let Some(remote) = self.remote_if_active() {
            match remote.fetch_all().await {
                Ok(records) => {
                    let count = self.replace_with_remote(records);
                    info!(count, "history loaded from remote store");
                    return LoadSource::Remote;
                }
                Err(e) => {
                    warn!(error = %e, "remote history unavailable, using local snapshot");
                    self.degrade();
                }
            }
        }

        match self.store.load() {
            Ok(Some(entries)) if !entries.is_empty() => {
                let mut state = self.state.lock();
                let limit = state.entries.limit();
                state.entries = EntryList::from_entries(entries, limit);
                state.next_id = state.entries.max_id().map_or(1, |max| max + 1);
                info!(count = state.entries.len(), "history loaded from snapshot");
                self.updates.send_replace(state.entries.entries().to_vec());
                LoadSource::Snapshot
            }
            Ok(_) => LoadSource::Empty,
            Err(e) => {
                warn!(error = %e, "history snapshot unreadable, starting empty");
                LoadSource::Empty
            }
        }
    }

    /// Record a completed operation at the head of the list.
    ///
    /// Always succeeds locally. The entry is not sent to the remote
    /// provider; a failed snapshot write is logged and otherwise ignored.
    pub fn append(
        &self,
        operator: Operator,
        operand1: f64,
        operand2: Option<f64>,
        result: f64,
    ) -> HistoryEntry {
        let mut state = self.state.lock();
        let id = state.next_id;
        let entry = HistoryEntry::new(id, operator, operand1, operand2, result, Utc::now());
        state.next_id += 1;
        state.entries = state.entries.record(entry.clone());

        self.commit(state);
        entry
    }

    /// Empty the ledger.
    ///
    /// In `Remote` mode the remote store is cleared first. If that fails
    /// the ledger drops to `LocalOnly` and the local list is still cleared.
    pub async fn clear(&self) {
        if let Some(remote) = self.remote_if_active() {
            if let Err(e) = remote.clear().await {
                warn!(error = %e, "remote history clear failed, switching to local-only mode");
                self.degrade();
            }
        }

        let mut state = self.state.lock();
        state.entries = state.entries.cleared();
        self.commit(state);
    }

    /// Copy of the current entries, most recent first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.state.lock().entries.entries().to_vec()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<HistoryEntry> {
        self.state.lock().entries.first().cloned()
    }

    pub fn mode(&self) -> LedgerMode {
        self.state.lock().mode
    }

    pub fn limit(&self) -> usize {
        self.state.lock().entries.limit()
    }

    /// Receive every new entry list as it is published.
    pub fn subscribe(&self) -> watch::Receiver<Vec<HistoryEntry>> {
        self.updates.subscribe()
    }

    fn remote_if_active(&self) -> Option<Arc<dyn HistoryProvider>> {
        match self.state.lock().mode {
            LedgerMode::Remote => self.remote.clone(),
            LedgerMode::LocalOnly => None,
        }
    }

    fn degrade(&self) {
        self.state.lock().mode = LedgerMode::LocalOnly;
    }

    fn replace_with_remote(&self, records: Vec<RemoteRecord>) -> usize {
        let mut state = self.state.lock();
        let limit = state.entries.limit();
        let kept: Vec<RemoteRecord> = records.into_iter().take(limit).collect();
        let count = kept.len() as u64;

        // Oldest kept record gets the lowest id.
        let first_id = state.next_id;
        let entries = kept
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let id = first_id + count - 1 - index as u64;
                HistoryEntry::new(
                    id,
                    record.operation.into(),
                    record.parameter1,
                    record.operand2(),
                    record.result,
                    record.date,
                )
            })
            .collect();

        state.entries = EntryList::from_entries(entries, limit);
        state.next_id = first_id + count;
        self.commit(state);
        count as usize
    }

    /// Publish the changed list, release the state lock, then write the
    /// snapshot. Readers never wait on snapshot I/O.
    fn commit(&self, mut state: MutexGuard<'_, LedgerState>) {
        state.revision += 1;
        let revision = state.revision;
        let entries = state.entries.entries().to_vec();
        self.updates.send_replace(entries.clone());
        drop(state);

        self.persist(revision, &entries);
    }

    fn persist(&self, revision: u64, entries: &[HistoryEntry]) {
        let mut written = self.written.lock();
        // A later change already reached the store.
        if *written >= revision {
            return;
        }
        match self.store.save(entries) {
            Ok(()) => *written = revision,
            Err(e) => warn!(error = %e, "failed to write history snapshot"),
        }
    }
}

impl std::fmt::Debug for HistoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HistoryLedger")
            .field("entries", &state.entries.len())
            .field("next_id", &state.next_id)
            .field("mode", &state.mode)
            .finish()
    }
}
