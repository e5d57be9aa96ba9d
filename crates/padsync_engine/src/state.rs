//! Sync engine state machine.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::SyncTransport;
use padsync_protocol::{ReadRequest, WriteRequest};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// The current state of the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Engine is idle, not syncing.
    Idle,
    /// Engine is polling the server for changes.
    Polling,
    /// Engine is pushing local content to the server.
    Pushing,
    /// Engine has completed a sync cycle.
    Synced,
    /// Engine encountered an error.
    Error,
    /// Engine is waiting before retrying.
    RetryWait,
}

impl SyncState {
    /// Returns true if the engine is in an active sync state.
    pub fn is_active(&self) -> bool {
        matches!(self, SyncState::Polling | SyncState::Pushing)
    }

    /// Returns true if the engine can start a new sync operation.
    pub fn can_start_sync(&self) -> bool {
        matches!(
            self,
            SyncState::Idle | SyncState::Synced | SyncState::Error | SyncState::RetryWait
        )
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total number of polls completed.
    pub polls_completed: u64,
    /// Number of polls that applied a remote change.
    pub changes_applied: u64,
    /// Total number of writes pushed.
    pub writes_pushed: u64,
    /// Total number of retries.
    pub retries: u64,
    /// Last successful sync time.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of a poll cycle.
#[derive(Debug, Clone, Copy)]
pub struct PollOutcome {
    /// Whether a remote change was applied.
    pub changed: bool,
    /// Server version after the poll.
    pub version: u64,
}

/// Receives remote document state accepted by the engine.
pub trait DocumentSink: Send + Sync {
    /// Applies a snapshot that superseded the locally tracked state.
    fn apply_remote(&self, content: &str, version: u64) -> SyncResult<()>;
}

/// In-memory sink holding the latest applied document state.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: RwLock<(String, u64)>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest applied content.
    pub fn content(&self) -> String {
        self.state.read().0.clone()
    }

    /// Returns the latest applied version.
    pub fn version(&self) -> u64 {
        self.state.read().1
    }
}

impl DocumentSink for MemorySink {
    fn apply_remote(&self, content: &str, version: u64) -> SyncResult<()> {
        *self.state.write() = (content.to_string(), version);
        Ok(())
    }
}

/// The sync engine manages reconciliation with the sync server.
///
/// `poll()` reads the full server state and applies it to the sink iff
/// the server's version differs from the locally tracked token.
/// `push()` writes local content with the tracked version as an
/// informational hint and adopts whatever version the server assigns.
pub struct SyncEngine<T: SyncTransport, S: DocumentSink> {
    config: SyncConfig,
    transport: Arc<T>,
    sink: Arc<S>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    local_version: AtomicU64,
    cancelled: AtomicBool,
}

impl<T: SyncTransport, S: DocumentSink> SyncEngine<T, S> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, transport: T, sink: S) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            sink: Arc::new(sink),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            local_version: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Gets the engine configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Gets the locally tracked version token.
    pub fn local_version(&self) -> u64 {
        self.local_version.load(Ordering::SeqCst)
    }

    /// Gets a handle to the document sink.
    pub fn sink(&self) -> Arc<S> {
        Arc::clone(&self.sink)
    }

    /// Cancels any ongoing sync operation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Resets the cancelled flag.
    pub fn reset_cancel(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    fn check_can_start(&self, to: &str) -> SyncResult<()> {
        let state = self.state();
        if state.can_start_sync() {
            Ok(())
        } else {
            Err(SyncError::InvalidStateTransition {
                from: format!("{state:?}"),
                to: to.into(),
            })
        }
    }

    fn record_error(&self, error: &SyncError) {
        self.set_state(SyncState::Error);
        self.stats.write().last_error = Some(error.to_string());
    }

    fn record_success(&self) {
        self.stats.write().last_sync_time = Some(Instant::now());
        self.set_state(SyncState::Synced);
    }

    /// Polls the server and applies the snapshot if the version moved.
    pub fn poll(&self) -> SyncResult<PollOutcome> {
        self.check_cancelled()?;
        self.check_can_start("poll")?;
        self.set_state(SyncState::Polling);

        let request = ReadRequest::new()
            .with_last_version(self.local_version())
            .with_client(self.config.client_key());

        let response = match self.transport.read(&request) {
            Ok(response) => response,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        let changed = response.version != self.local_version();
        if changed {
            if let Err(e) = self.sink.apply_remote(&response.content, response.version) {
                self.record_error(&e);
                return Err(e);
            }
            self.local_version.store(response.version, Ordering::SeqCst);
            self.stats.write().changes_applied += 1;
            tracing::debug!(version = response.version, "applied remote snapshot");
        }

        self.stats.write().polls_completed += 1;
        self.record_success();

        Ok(PollOutcome {
            changed,
            version: response.version,
        })
    }

    /// Polls with retry on retryable failures, per the retry config.
    pub fn poll_with_retry(&self) -> SyncResult<PollOutcome> {
        let mut attempt = 0;
        loop {
            match self.poll() {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && attempt + 1 < self.config.retry.max_attempts => {
                    attempt += 1;
                    self.stats.write().retries += 1;
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    tracing::debug!(attempt, ?delay, error = %e, "poll failed, retrying");
                    self.set_state(SyncState::RetryWait);
                    std::thread::sleep(delay);
                    self.check_cancelled()?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Pushes local content to the server and adopts the new version.
    ///
    /// The tracked version is sent as an informational hint; the server
    /// applies the write regardless (last-writer-wins).
    pub fn push(&self, content: &str) -> SyncResult<u64> {
        self.check_cancelled()?;
        self.check_can_start("push")?;
        self.set_state(SyncState::Pushing);

        let request = WriteRequest::new(content).with_version(self.local_version());

        let response = match self.transport.write(&request) {
            Ok(response) => response,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };

        if !response.success {
            let e = SyncError::ServerRejected(
                response.error.unwrap_or_else(|| "write not applied".into()),
            );
            self.record_error(&e);
            return Err(e);
        }

        if let Err(e) = self.sink.apply_remote(content, response.version) {
            self.record_error(&e);
            return Err(e);
        }
        self.local_version.store(response.version, Ordering::SeqCst);
        self.stats.write().writes_pushed += 1;
        self.record_success();

        tracing::debug!(version = response.version, "pushed local content");
        Ok(response.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use padsync_protocol::{
        HealthResponse, PresenceResponse, ReadResponse, WriteResponse,
    };
    use std::sync::atomic::AtomicU32;

    fn engine_with(
        transport: MockTransport,
    ) -> SyncEngine<MockTransport, MemorySink> {
        SyncEngine::new(SyncConfig::new("http://test"), transport, MemorySink::new())
    }

    #[test]
    fn state_classification() {
        assert!(SyncState::Polling.is_active());
        assert!(!SyncState::Synced.is_active());
        assert!(SyncState::Idle.can_start_sync());
        assert!(SyncState::Error.can_start_sync());
        assert!(!SyncState::Pushing.can_start_sync());
    }

    #[test]
    fn poll_applies_remote_change() {
        let transport = MockTransport::new();
        transport.set_read_response(ReadResponse::new("hello", 1, None));
        let engine = engine_with(transport);

        let outcome = engine.poll().unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.version, 1);
        assert_eq!(engine.local_version(), 1);
        assert_eq!(engine.sink().content(), "hello");
        assert_eq!(engine.state(), SyncState::Synced);

        let stats = engine.stats();
        assert_eq!(stats.polls_completed, 1);
        assert_eq!(stats.changes_applied, 1);
    }

    #[test]
    fn poll_skips_unchanged_version() {
        let transport = MockTransport::new();
        transport.set_read_response(ReadResponse::new("", 0, None));
        let engine = engine_with(transport);

        let outcome = engine.poll().unwrap();
        assert!(!outcome.changed);
        assert_eq!(engine.stats().changes_applied, 0);
        assert_eq!(engine.stats().polls_completed, 1);
    }

    #[test]
    fn push_adopts_server_version() {
        let transport = MockTransport::new();
        transport.set_write_response(WriteResponse::success(5, 1_700_000_000_000));
        let engine = engine_with(transport);

        let version = engine.push("local edit").unwrap();
        assert_eq!(version, 5);
        assert_eq!(engine.local_version(), 5);
        assert_eq!(engine.sink().content(), "local edit");
        assert_eq!(engine.stats().writes_pushed, 1);
    }

    #[test]
    fn push_rejection_surfaces_as_error() {
        let transport = MockTransport::new();
        transport.set_write_response(WriteResponse::error("content too large"));
        let engine = engine_with(transport);

        let result = engine.push("huge");
        assert!(matches!(result, Err(SyncError::ServerRejected(_))));
        assert_eq!(engine.state(), SyncState::Error);
        assert_eq!(engine.local_version(), 0);
    }

    #[test]
    fn transport_failure_records_error_state() {
        let transport = MockTransport::new();
        transport.set_connected(false);
        let engine = engine_with(transport);

        let result = engine.poll();
        assert!(matches!(result, Err(SyncError::NotConnected)));
        assert_eq!(engine.state(), SyncState::Error);
        assert!(engine.stats().last_error.is_some());
    }

    #[test]
    fn cancelled_engine_refuses_operations() {
        let transport = MockTransport::new();
        transport.set_read_response(ReadResponse::new("", 0, None));
        let engine = engine_with(transport);

        engine.cancel();
        assert!(matches!(engine.poll(), Err(SyncError::Cancelled)));

        engine.reset_cancel();
        assert!(engine.poll().is_ok());
    }

    #[test]
    fn poll_then_push_round() {
        let transport = MockTransport::new();
        transport.set_read_response(ReadResponse::new("remote", 2, None));
        transport.set_write_response(WriteResponse::success(3, 1_700_000_000_000));
        let engine = engine_with(transport);

        engine.poll().unwrap();
        assert_eq!(engine.local_version(), 2);

        engine.push("remote plus edit").unwrap();
        assert_eq!(engine.local_version(), 3);
        assert_eq!(engine.sink().content(), "remote plus edit");
    }

    /// Transport that fails a fixed number of reads before succeeding.
    struct FlakyTransport {
        failures_left: AtomicU32,
        inner: MockTransport,
    }

    impl FlakyTransport {
        fn new(failures: u32, response: ReadResponse) -> Self {
            let inner = MockTransport::new();
            inner.set_read_response(response);
            Self {
                failures_left: AtomicU32::new(failures),
                inner,
            }
        }
    }

    impl SyncTransport for FlakyTransport {
        fn read(&self, request: &ReadRequest) -> SyncResult<ReadResponse> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(SyncError::transport_retryable("connection reset"));
            }
            self.inner.read(request)
        }

        fn write(&self, request: &WriteRequest) -> SyncResult<WriteResponse> {
            self.inner.write(request)
        }

        fn presence(&self) -> SyncResult<PresenceResponse> {
            self.inner.presence()
        }

        fn health(&self) -> SyncResult<HealthResponse> {
            self.inner.health()
        }

        fn is_connected(&self) -> bool {
            true
        }

        fn close(&self) -> SyncResult<()> {
            Ok(())
        }
    }

    #[test]
    fn poll_with_retry_recovers_from_transient_failures() {
        let transport = FlakyTransport::new(2, ReadResponse::new("eventually", 1, None));
        let config = SyncConfig::new("http://test").with_retry(
            crate::config::RetryConfig::new(3)
                .with_initial_delay(std::time::Duration::from_millis(1)),
        );
        let engine = SyncEngine::new(config, transport, MemorySink::new());

        let outcome = engine.poll_with_retry().unwrap();
        assert!(outcome.changed);
        assert_eq!(engine.stats().retries, 2);
        assert_eq!(engine.sink().content(), "eventually");
    }

    #[test]
    fn poll_with_retry_exhausts_attempts() {
        let transport = FlakyTransport::new(10, ReadResponse::new("never", 1, None));
        let config = SyncConfig::new("http://test").with_retry(
            crate::config::RetryConfig::new(2)
                .with_initial_delay(std::time::Duration::from_millis(1)),
        );
        let engine = SyncEngine::new(config, transport, MemorySink::new());

        let result = engine.poll_with_retry();
        assert!(matches!(result, Err(SyncError::Transport { .. })));
        assert_eq!(engine.stats().retries, 1);
    }
}
