//! Transport layer abstraction for sync operations.

use crate::error::{SyncError, SyncResult};
use padsync_protocol::{
    HealthResponse, PresenceResponse, ReadRequest, ReadResponse, WriteRequest, WriteResponse,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A sync transport handles communication with the sync server.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, loopback, mock for testing).
pub trait SyncTransport: Send + Sync {
    /// Reads the full current document state.
    fn read(&self, request: &ReadRequest) -> SyncResult<ReadResponse>;

    /// Writes new document content.
    fn write(&self, request: &WriteRequest) -> SyncResult<WriteResponse>;

    /// Queries the active-client count.
    fn presence(&self) -> SyncResult<PresenceResponse>;

    /// Queries server liveness.
    fn health(&self) -> SyncResult<HealthResponse>;

    /// Checks if the transport is connected.
    fn is_connected(&self) -> bool;

    /// Closes the transport connection.
    fn close(&self) -> SyncResult<()>;
}

/// A mock transport for testing.
#[derive(Debug, Default)]
pub struct MockTransport {
    connected: AtomicBool,
    read_response: Mutex<Option<ReadResponse>>,
    write_response: Mutex<Option<WriteResponse>>,
    presence_response: Mutex<Option<PresenceResponse>>,
    health_response: Mutex<Option<HealthResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            read_response: Mutex::new(None),
            write_response: Mutex::new(None),
            presence_response: Mutex::new(None),
            health_response: Mutex::new(None),
        }
    }

    /// Sets the read response.
    pub fn set_read_response(&self, response: ReadResponse) {
        *self.read_response.lock() = Some(response);
    }

    /// Sets the write response.
    pub fn set_write_response(&self, response: WriteResponse) {
        *self.write_response.lock() = Some(response);
    }

    /// Sets the presence response.
    pub fn set_presence_response(&self, response: PresenceResponse) {
        *self.presence_response.lock() = Some(response);
    }

    /// Sets the health response.
    pub fn set_health_response(&self, response: HealthResponse) {
        *self.health_response.lock() = Some(response);
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl SyncTransport for MockTransport {
    fn read(&self, _request: &ReadRequest) -> SyncResult<ReadResponse> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        self.read_response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::Protocol("no mock read response set".into()))
    }

    fn write(&self, _request: &WriteRequest) -> SyncResult<WriteResponse> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        self.write_response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::Protocol("no mock write response set".into()))
    }

    fn presence(&self) -> SyncResult<PresenceResponse> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        self.presence_response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::Protocol("no mock presence response set".into()))
    }

    fn health(&self) -> SyncResult<HealthResponse> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        self.health_response
            .lock()
            .clone()
            .ok_or_else(|| SyncError::Protocol("no mock health response set".into()))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) -> SyncResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
