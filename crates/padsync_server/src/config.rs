//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Recency window for the active-client count. Clients not seen
    /// within this window are evicted lazily on each access.
    pub presence_window: Duration,
    /// Maximum accepted content size in bytes. Larger writes are
    /// rejected without touching the document.
    pub max_content_bytes: usize,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            presence_window: Duration::from_secs(10),
            max_content_bytes: 1024 * 1024,
        }
    }

    /// Sets the presence recency window.
    pub fn with_presence_window(mut self, window: Duration) -> Self {
        self.presence_window = window;
        self
    }

    /// Sets the maximum accepted content size.
    pub fn with_max_content_bytes(mut self, bytes: usize) -> Self {
        self.max_content_bytes = bytes;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}
