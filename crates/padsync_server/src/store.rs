//! The shared document store.

use parking_lot::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Converts a timestamp to Unix epoch milliseconds.
pub fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A fully-written view of the shared document.
///
/// Every snapshot observed by any reader was, at some point, the true
/// state produced by exactly one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Document content at the time of the snapshot.
    pub content: String,
    /// Document version at the time of the snapshot.
    pub version: u64,
    /// Timestamp of the most recent write; absent before the first write.
    pub last_update: Option<SystemTime>,
}

impl DocumentSnapshot {
    /// Returns the last-update timestamp as Unix epoch milliseconds.
    pub fn last_update_millis(&self) -> Option<u64> {
        self.last_update.map(epoch_millis)
    }
}

/// Mutable document state. Only ever touched under the store's lock.
#[derive(Debug)]
struct DocumentState {
    content: String,
    version: u64,
    last_update: Option<SystemTime>,
}

/// The process-wide document store.
///
/// Holds the single shared document: its content, a monotonically
/// increasing version counter, and the timestamp of the last accepted
/// write. Writes replace the content wholesale under an exclusive lock,
/// so reads never observe a half-written value. There is no persistence;
/// the document resets with the process.
pub struct DocumentStore {
    state: RwLock<DocumentState>,
}

impl DocumentStore {
    /// Creates an empty store at version 0.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DocumentState {
                content: String::new(),
                version: 0,
                last_update: None,
            }),
        }
    }

    /// Returns the current document version.
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    /// Returns the full current state.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let state = self.state.read();
        DocumentSnapshot {
            content: state.content.clone(),
            version: state.version,
            last_update: state.last_update,
        }
    }

    /// Replaces the document content and bumps the version by one.
    ///
    /// The `hint` is the writer's last known version. It never blocks the
    /// write: a stale hint is logged and the write applies anyway
    /// (last-writer-wins). Returns the new version and write timestamp.
    pub fn write(&self, content: impl Into<String>, hint: Option<u64>) -> (u64, SystemTime) {
        let mut state = self.state.write();

        if let Some(hint) = hint {
            if hint != state.version {
                tracing::debug!(hint, current = state.version, "stale version hint on write");
            }
        }

        let now = SystemTime::now();
        state.content = content.into();
        state.version += 1;
        state.last_update = Some(now);

        (state.version, now)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
