//! Request handlers for sync endpoints.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::presence::PresenceTracker;
use crate::store::{epoch_millis, DocumentStore};
use padsync_protocol::{
    HealthResponse, PresenceRequest, PresenceResponse, ReadRequest, ReadResponse, WriteRequest,
    WriteResponse,
};
use std::sync::Arc;

/// Context for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Document store (shared across all handlers).
    pub store: Arc<DocumentStore>,
    /// Presence tracker for the active-client count.
    pub presence: PresenceTracker,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(config: ServerConfig, store: Arc<DocumentStore>) -> Self {
        let presence = PresenceTracker::new(config.presence_window);
        Self {
            config,
            store,
            presence,
        }
    }
}

/// Handler for sync requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles a write request.
    ///
    /// The content replaces the document unconditionally; the version
    /// hint never causes a rejection. Only a payload that violates the
    /// configured size ceiling is refused, leaving the document as-is.
    pub fn handle_write(&self, request: WriteRequest) -> ServerResult<WriteResponse> {
        let max = self.context.config.max_content_bytes;
        if request.content.len() > max {
            return Err(ServerError::InvalidRequest(format!(
                "content too large: {} > {} bytes",
                request.content.len(),
                max
            )));
        }

        let (version, timestamp) = self.context.store.write(request.content, request.version);
        tracing::debug!(version, "write applied");

        Ok(WriteResponse::success(version, epoch_millis(timestamp)))
    }

    /// Handles a read request.
    ///
    /// Always returns the full current state; `changed` is computed from
    /// the request's last known version. Touches presence for the
    /// calling client when a key is supplied.
    pub fn handle_read(&self, request: ReadRequest) -> ReadResponse {
        if let Some(client) = &request.client {
            self.context.presence.touch(client);
        }

        let snapshot = self.context.store.snapshot();
        let last_update_millis = snapshot.last_update_millis();
        ReadResponse::new(
            snapshot.content,
            snapshot.version,
            last_update_millis,
        )
        .with_changed_since(request.last_version)
    }

    /// Handles a presence request.
    pub fn handle_presence(&self, _request: PresenceRequest) -> PresenceResponse {
        PresenceResponse::new(self.context.presence.active_count())
    }

    /// Handles a health request. No side effects on the document.
    pub fn handle_health(&self) -> HealthResponse {
        HealthResponse::ok(self.context.store.version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padsync_protocol::PresenceRequest;

    fn create_handler() -> RequestHandler {
        let config = ServerConfig::default();
        let store = Arc::new(DocumentStore::new());
        let context = Arc::new(HandlerContext::new(config, store));
        RequestHandler::new(context)
    }

    #[test]
    fn write_then_read() {
        let handler = create_handler();

        let written = handler.handle_write(WriteRequest::new("hello")).unwrap();
        assert!(written.success);
        assert_eq!(written.version, 1);
        assert!(written.last_update.is_some());

        let read = handler.handle_read(ReadRequest::new());
        assert_eq!(read.content, "hello");
        assert_eq!(read.version, 1);
    }

    #[test]
    fn read_reports_change_against_stale_version() {
        let handler = create_handler();
        handler.handle_write(WriteRequest::new("hello")).unwrap();
        handler
            .handle_write(WriteRequest::new("hello world").with_version(1))
            .unwrap();

        let read = handler.handle_read(ReadRequest::new().with_last_version(1));
        assert_eq!(read.version, 2);
        assert_eq!(read.content, "hello world");
        assert!(read.changed);

        let read = handler.handle_read(ReadRequest::new().with_last_version(2));
        assert!(!read.changed);
    }

    #[test]
    fn stale_hint_never_rejected() {
        let handler = create_handler();
        handler.handle_write(WriteRequest::new("a")).unwrap();
        handler.handle_write(WriteRequest::new("b")).unwrap();

        // Hint far behind and far ahead: both writes still apply.
        let resp = handler
            .handle_write(WriteRequest::new("c").with_version(0))
            .unwrap();
        assert!(resp.success);
        assert_eq!(resp.version, 3);

        let resp = handler
            .handle_write(WriteRequest::new("d").with_version(999))
            .unwrap();
        assert!(resp.success);
        assert_eq!(resp.version, 4);
    }

    #[test]
    fn oversized_write_leaves_document_unchanged() {
        let config = ServerConfig::default().with_max_content_bytes(4);
        let store = Arc::new(DocumentStore::new());
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = RequestHandler::new(context);

        handler.handle_write(WriteRequest::new("ok")).unwrap();

        let err = handler
            .handle_write(WriteRequest::new("way too long"))
            .unwrap_err();
        assert!(err.is_client_error());

        let read = handler.handle_read(ReadRequest::new());
        assert_eq!(read.content, "ok");
        assert_eq!(read.version, 1);
    }

    #[test]
    fn read_touches_presence() {
        let handler = create_handler();

        handler.handle_read(ReadRequest::new().with_client("client-a"));
        handler.handle_read(ReadRequest::new().with_client("client-b"));
        // Anonymous reads do not register.
        handler.handle_read(ReadRequest::new());

        let presence = handler.handle_presence(PresenceRequest::new());
        assert_eq!(presence.count, 2);
    }

    #[test]
    fn health_reports_latest_version_without_mutation() {
        let handler = create_handler();
        handler.handle_write(WriteRequest::new("x")).unwrap();

        let health = handler.handle_health();
        assert!(health.is_ok());
        assert_eq!(health.version, 1);

        // Health is side-effect free.
        assert_eq!(handler.handle_health().version, 1);
        assert_eq!(handler.handle_read(ReadRequest::new()).version, 1);
    }
}
