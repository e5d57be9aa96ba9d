//! HTTP transport implementation.
//!
//! This module provides an HTTP-based transport for the sync engine.
//! The actual HTTP client is abstracted via a trait to allow different
//! implementations (reqwest, hyper, or a loopback client for tests).

use crate::error::{SyncError, SyncResult};
use crate::transport::SyncTransport;
use padsync_protocol::{
    HealthResponse, PresenceResponse, ReadRequest, ReadResponse, WriteRequest, WriteResponse,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. This
/// allows using different HTTP libraries (reqwest, ureq, etc.) without
/// the engine depending on any of them.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, String>;

    /// Sends a POST request with a JSON body and returns the response body.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String>;

    /// Checks if the client is connected/healthy.
    fn is_healthy(&self) -> bool;
}

/// HTTP-based sync transport.
///
/// Uses JSON encoding for request/response bodies.
pub struct HttpTransport<C: HttpClient> {
    /// Base URL of the sync server (e.g. `http://127.0.0.1:8080`).
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Connection state.
    connected: AtomicBool,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn set_error(&self, err: &str) {
        *self.last_error.write() = Some(err.to_string());
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    fn check_connected(&self) -> SyncResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SyncError::NotConnected)
        }
    }

    // Transient failures leave `connected` alone: the caller recovers by
    // retrying on its next poll/debounce cycle. Only close() disconnects.
    fn send_get(&self, url: &str) -> SyncResult<Vec<u8>> {
        self.check_connected()?;
        let body = self.client.get(url).map_err(|e| {
            self.set_error(&e);
            SyncError::transport_retryable(e)
        })?;
        self.clear_error();
        Ok(body)
    }

    fn send_post(&self, url: &str, body: Vec<u8>) -> SyncResult<Vec<u8>> {
        self.check_connected()?;
        let body = self.client.post(url, body).map_err(|e| {
            self.set_error(&e);
            SyncError::transport_retryable(e)
        })?;
        self.clear_error();
        Ok(body)
    }

    fn read_url(&self, request: &ReadRequest) -> String {
        let mut url = format!("{}/sync/read", self.base_url);
        let mut separator = '?';
        if let Some(version) = request.last_version {
            url.push(separator);
            url.push_str(&format!("version={version}"));
            separator = '&';
        }
        if let Some(client) = &request.client {
            url.push(separator);
            url.push_str(&format!("client={client}"));
        }
        url
    }
}

impl<C: HttpClient> SyncTransport for HttpTransport<C> {
    fn read(&self, request: &ReadRequest) -> SyncResult<ReadResponse> {
        let body = self.send_get(&self.read_url(request))?;
        ReadResponse::decode(&body)
            .map_err(|e| SyncError::Protocol(format!("failed to decode read response: {e}")))
    }

    fn write(&self, request: &WriteRequest) -> SyncResult<WriteResponse> {
        let payload = request
            .encode()
            .map_err(|e| SyncError::Protocol(format!("failed to encode write request: {e}")))?;
        let url = format!("{}/sync/write", self.base_url);
        let body = self.send_post(&url, payload)?;
        WriteResponse::decode(&body)
            .map_err(|e| SyncError::Protocol(format!("failed to decode write response: {e}")))
    }

    fn presence(&self) -> SyncResult<PresenceResponse> {
        let url = format!("{}/sync/presence", self.base_url);
        let body = self.send_get(&url)?;
        PresenceResponse::decode(&body)
            .map_err(|e| SyncError::Protocol(format!("failed to decode presence response: {e}")))
    }

    fn health(&self) -> SyncResult<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let body = self.send_get(&url)?;
        HealthResponse::decode(&body)
            .map_err(|e| SyncError::Protocol(format!("failed to decode health response: {e}")))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.client.is_healthy()
    }

    fn close(&self) -> SyncResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing the full protocol stack without network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles a GET request; `path` includes the query string.
    fn handle_get(&self, path: &str) -> Result<Vec<u8>, String>;

    /// Handles a POST request and returns the response body.
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, String>;
}

/// Extracts the request path (plus query) from a full URL.
fn url_path(url: &str) -> &str {
    url.find("/sync/")
        .or_else(|| url.find("/health"))
        .map(|i| &url[i..])
        .unwrap_or(url)
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        self.server.handle_get(url_path(url))
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String> {
        self.server.handle_post(url_path(url), &body)
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
