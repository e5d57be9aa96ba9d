//! Best-effort presence tracking.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks which clients have been seen recently.
///
/// This is ephemeral bookkeeping for the active-client count: a map from
/// opaque client key to last-seen instant, pruned lazily by a fixed
/// recency window on each access. It carries no correctness obligations
/// and is not part of the synchronization contract.
pub struct PresenceTracker {
    window: Duration,
    seen: RwLock<HashMap<String, Instant>>,
}

impl PresenceTracker {
    /// Creates a tracker with the given recency window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: RwLock::new(HashMap::new()),
        }
    }

    /// Records activity for a client.
    pub fn touch(&self, client: &str) {
        self.seen.write().insert(client.to_string(), Instant::now());
    }

    /// Returns the number of clients seen within the window.
    ///
    /// Entries older than the window are evicted here, so the map never
    /// grows past the set of recently active clients.
    pub fn active_count(&self) -> usize {
        let mut seen = self.seen.write();
        let window = self.window;
        seen.retain(|_, last_seen| last_seen.elapsed() <= window);
        seen.len()
    }
}
