//! Main sync server facade.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use crate::store::{DocumentSnapshot, DocumentStore};
use padsync_protocol::{
    HealthResponse, PresenceRequest, PresenceResponse, ReadRequest, ReadResponse, SyncMessage,
    WriteRequest, WriteResponse,
};
use std::sync::Arc;

/// The sync server.
///
/// Owns the document store and presence tracker and exposes the sync
/// protocol operations to any transport. The HTTP binding in
/// [`crate::http`] is one such transport; tests embed the server
/// directly.
///
/// # Example
///
/// ```
/// use padsync_server::{ServerConfig, SyncServer};
/// use padsync_protocol::WriteRequest;
///
/// let server = SyncServer::new(ServerConfig::default());
/// let response = server.handle_write(WriteRequest::new("hello")).unwrap();
/// assert_eq!(response.version, 1);
/// ```
pub struct SyncServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Creates a new sync server with an empty document.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(DocumentStore::new()))
    }

    /// Creates a sync server over an existing document store.
    pub fn with_store(config: ServerConfig, store: Arc<DocumentStore>) -> Self {
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = RequestHandler::new(Arc::clone(&context));

        Self { handler, context }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Handles a write request.
    pub fn handle_write(&self, request: WriteRequest) -> ServerResult<WriteResponse> {
        self.handler.handle_write(request)
    }

    /// Handles a read request.
    pub fn handle_read(&self, request: ReadRequest) -> ReadResponse {
        self.handler.handle_read(request)
    }

    /// Handles a presence request.
    pub fn handle_presence(&self, request: PresenceRequest) -> PresenceResponse {
        self.handler.handle_presence(request)
    }

    /// Handles a health request.
    pub fn handle_health(&self) -> HealthResponse {
        self.handler.handle_health()
    }

    /// Handles a sync message (dispatches to the appropriate handler).
    pub fn handle_message(&self, message: SyncMessage) -> ServerResult<SyncMessage> {
        match message {
            SyncMessage::WriteRequest(req) => {
                self.handle_write(req).map(SyncMessage::WriteResponse)
            }
            SyncMessage::ReadRequest(req) => Ok(SyncMessage::ReadResponse(self.handle_read(req))),
            SyncMessage::PresenceRequest(req) => {
                Ok(SyncMessage::PresenceResponse(self.handle_presence(req)))
            }
            SyncMessage::HealthRequest(_) => {
                Ok(SyncMessage::HealthResponse(self.handle_health()))
            }
            _ => Err(ServerError::InvalidRequest(
                "unexpected message type".into(),
            )),
        }
    }

    /// Returns the current document version.
    pub fn version(&self) -> u64 {
        self.context.store.version()
    }

    /// Returns the full current document state.
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.context.store.snapshot()
    }

    /// Returns the best-effort active client count.
    pub fn active_clients(&self) -> usize {
        self.context.presence.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_lifecycle() {
        let server = SyncServer::new(ServerConfig::default());
        assert_eq!(server.version(), 0);
        assert_eq!(server.snapshot().content, "");
        assert_eq!(server.active_clients(), 0);
    }

    #[test]
    fn full_sync_flow() {
        let server = SyncServer::new(ServerConfig::default());

        // 1. Initial read: empty document at version 0.
        let read = server.handle_read(ReadRequest::new().with_client("dev-1"));
        assert_eq!(read.version, 0);
        assert_eq!(read.content, "");

        // 2. Write from one client.
        let written = server
            .handle_write(WriteRequest::new("hello").with_version(read.version))
            .unwrap();
        assert!(written.success);
        assert_eq!(written.version, 1);

        // 3. Another client polls and detects the change.
        let read = server.handle_read(
            ReadRequest::new()
                .with_last_version(0)
                .with_client("dev-2"),
        );
        assert!(read.changed);
        assert_eq!(read.content, "hello");

        // 4. Both clients count as active.
        assert_eq!(server.active_clients(), 2);
    }

    #[test]
    fn message_dispatch() {
        let server = SyncServer::new(ServerConfig::default());

        let message = SyncMessage::WriteRequest(WriteRequest::new("dispatched"));
        let response = server.handle_message(message).unwrap();
        assert!(matches!(response, SyncMessage::WriteResponse(_)));

        let message = SyncMessage::ReadRequest(ReadRequest::new());
        let response = server.handle_message(message).unwrap();
        assert!(matches!(
            response,
            SyncMessage::ReadResponse(ref read) if read.content == "dispatched"
        ));
    }

    #[test]
    fn dispatch_rejects_response_messages() {
        let server = SyncServer::new(ServerConfig::default());

        let message = SyncMessage::WriteResponse(WriteResponse::success(1, 0));
        let result = server.handle_message(message);
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }

    #[test]
    fn shared_store() {
        let store = Arc::new(DocumentStore::new());
        let server = SyncServer::with_store(ServerConfig::default(), Arc::clone(&store));

        server.handle_write(WriteRequest::new("shared")).unwrap();

        // Visible through the store handle directly.
        assert_eq!(store.snapshot().content, "shared");
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn health_matches_last_write() {
        let server = SyncServer::new(ServerConfig::default());
        server.handle_write(WriteRequest::new("a")).unwrap();
        server.handle_write(WriteRequest::new("b")).unwrap();

        let health = server.handle_health();
        assert!(health.is_ok());
        assert_eq!(health.version, 2);
    }
}
