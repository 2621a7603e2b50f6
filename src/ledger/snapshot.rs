//! Local snapshot of the history ledger.
//!
//! The snapshot is a single slot holding the serialized entry list. It
//! is read once at startup and rewritten after every successful append
//! or clear. It is only consulted when the remote store is unreachable.

use crate::core::HistoryEntry;
use crate::ledger::error::SnapshotError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of the ledger's entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,

    /// Entries, most recent first
    pub entries: Vec<HistoryEntry>,
}

/// Accepted on read: the versioned document, or a bare entry array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Versioned(Snapshot),
    Bare(Vec<HistoryEntry>),
}

impl Snapshot {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let stored: StoredSnapshot = serde_json::from_str(text)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;

        match stored {
            StoredSnapshot::Versioned(snapshot) if snapshot.version != SNAPSHOT_VERSION => {
                Err(SnapshotError::UnsupportedVersion {
                    found: snapshot.version,
                    supported: SNAPSHOT_VERSION,
                })
            }
            StoredSnapshot::Versioned(snapshot) => Ok(snapshot),
            StoredSnapshot::Bare(entries) => Ok(Self::new(entries)),
        }
    }
}

/// Key-value slot that persists the entry list between sessions.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored entries. `Ok(None)` means nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, SnapshotError>;

    /// Replace the stored entries.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), SnapshotError>;
}

/// JSON file on disk, written atomically via a temp file and rename.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = OsString::from(self.path.as_os_str());
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, SnapshotError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Snapshot::from_json(&text).map(|snapshot| Some(snapshot.entries))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = Snapshot::new(entries.to_vec()).to_json()?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// In-process slot; the serialized text is kept exactly as a file would hold it.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored text, as if written by an earlier session.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(text.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Vec<HistoryEntry>>, SnapshotError> {
        match self.slot.lock().as_deref() {
            Some(text) => Snapshot::from_json(text).map(|snapshot| Some(snapshot.entries)),
            None => Ok(None),
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), SnapshotError> {
        let json = Snapshot::new(entries.to_vec()).to_json()?;
        *self.slot.lock() = Some(json);
        Ok(())
    }
}
