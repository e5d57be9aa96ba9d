//! Protocol messages for shared-document sync.

use crate::codec::{from_json, to_json, CodecResult};
use serde::{Deserialize, Serialize};

/// Current protocol version.
pub const PROTOCOL_VERSION: u16 = 1;

/// A sync protocol message.
#[derive(Debug, Clone)]
pub enum SyncMessage {
    /// Write request.
    WriteRequest(WriteRequest),
    /// Write response.
    WriteResponse(WriteResponse),
    /// Read request.
    ReadRequest(ReadRequest),
    /// Read response.
    ReadResponse(ReadResponse),
    /// Presence request.
    PresenceRequest(PresenceRequest),
    /// Presence response.
    PresenceResponse(PresenceResponse),
    /// Health request.
    HealthRequest(HealthRequest),
    /// Health response.
    HealthResponse(HealthResponse),
}

impl SyncMessage {
    /// Returns the message type code.
    pub fn type_code(&self) -> u8 {
        match self {
            SyncMessage::WriteRequest(_) => 1,
            SyncMessage::WriteResponse(_) => 2,
            SyncMessage::ReadRequest(_) => 3,
            SyncMessage::ReadResponse(_) => 4,
            SyncMessage::PresenceRequest(_) => 5,
            SyncMessage::PresenceResponse(_) => 6,
            SyncMessage::HealthRequest(_) => 7,
            SyncMessage::HealthResponse(_) => 8,
        }
    }

    /// Returns true if this is a request message.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            SyncMessage::WriteRequest(_)
                | SyncMessage::ReadRequest(_)
                | SyncMessage::PresenceRequest(_)
                | SyncMessage::HealthRequest(_)
        )
    }
}

/// Write request from a client.
///
/// Replaces the entire document content. The `version` field is the
/// client's last known version and is informational only: the server
/// applies the write regardless (last-writer-wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    /// New document content.
    pub content: String,
    /// Client's last known version, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl WriteRequest {
    /// Creates a new write request.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            version: None,
        }
    }

    /// Sets the client's last known version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Write response from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Whether the write was applied.
    pub success: bool,
    /// Document version after the write.
    pub version: u64,
    /// Timestamp of the write, as Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<u64>,
    /// Error message if the write was not applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteResponse {
    /// Creates a successful write response.
    pub fn success(version: u64, last_update: u64) -> Self {
        Self {
            success: true,
            version,
            last_update: Some(last_update),
            error: None,
        }
    }

    /// Creates a failed write response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            version: 0,
            last_update: None,
            error: Some(message.into()),
        }
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Read request from a client.
///
/// The server always answers with the full current state; `last_version`
/// only drives the `changed` flag in the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Client's last known version, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_version: Option<u64>,
    /// Opaque client key for presence tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl ReadRequest {
    /// Creates a read request with no known version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client's last known version.
    pub fn with_last_version(mut self, version: u64) -> Self {
        self.last_version = Some(version);
        self
    }

    /// Sets the client key.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Read response from the server: the full current document state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Current document content.
    pub content: String,
    /// Current document version.
    pub version: u64,
    /// Timestamp of the last write, as Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<u64>,
    /// Whether the document changed relative to the request's
    /// `last_version` (always true when no version was supplied).
    pub changed: bool,
}

impl ReadResponse {
    /// Creates a new read response.
    pub fn new(content: impl Into<String>, version: u64, last_update: Option<u64>) -> Self {
        Self {
            content: content.into(),
            version,
            last_update,
            changed: true,
        }
    }

    /// Sets the `changed` flag from a client's last known version.
    pub fn with_changed_since(mut self, last_version: Option<u64>) -> Self {
        self.changed = last_version != Some(self.version);
        self
    }

    /// Returns true if this state is newer than the given version token.
    pub fn is_newer_than(&self, version: u64) -> bool {
        self.version != version
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Presence request: ask for the active client count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRequest {}

impl PresenceRequest {
    /// Creates a presence request.
    pub fn new() -> Self {
        Self {}
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Presence response: best-effort count of recently active clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceResponse {
    /// Number of clients seen within the presence window.
    pub count: usize,
}

impl PresenceResponse {
    /// Creates a presence response.
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Health request: liveness query, no side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRequest {}

impl HealthRequest {
    /// Creates a health request.
    pub fn new() -> Self {
        Self {}
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

/// Health response from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string, `"ok"` when healthy.
    pub status: String,
    /// Current document version.
    pub version: u64,
}

impl HealthResponse {
    /// Creates a healthy response for the given version.
    pub fn ok(version: u64) -> Self {
        Self {
            status: "ok".into(),
            version,
        }
    }

    /// Returns true if the status is `"ok"`.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        to_json(self)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        from_json(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_request_roundtrip() {
        let req = WriteRequest::new("hello").with_version(3);
        let bytes = req.encode().unwrap();
        let decoded = WriteRequest::decode(&bytes).unwrap();

        assert_eq!(decoded.content, "hello");
        assert_eq!(decoded.version, Some(3));
    }

    #[test]
    fn write_request_missing_content_rejected() {
        let err = WriteRequest::decode(b"{\"version\": 1}").unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn write_request_non_text_content_rejected() {
        assert!(WriteRequest::decode(b"{\"content\": 42}").is_err());
        assert!(WriteRequest::decode(b"{\"content\": null}").is_err());
    }

    #[test]
    fn write_response_success() {
        let resp = WriteResponse::success(7, 1_700_000_000_000);
        let bytes = resp.encode().unwrap();
        let decoded = WriteResponse::decode(&bytes).unwrap();

        assert!(decoded.success);
        assert_eq!(decoded.version, 7);
        assert_eq!(decoded.last_update, Some(1_700_000_000_000));
        assert!(decoded.error.is_none());
    }

    #[test]
    fn write_response_error() {
        let resp = WriteResponse::error("content too large");
        let decoded = WriteResponse::decode(&resp.encode().unwrap()).unwrap();

        assert!(!decoded.success);
        assert_eq!(decoded.error, Some("content too large".to_string()));
    }

    #[test]
    fn read_request_defaults() {
        let decoded = ReadRequest::decode(b"{}").unwrap();
        assert_eq!(decoded.last_version, None);
        assert_eq!(decoded.client, None);
    }

    #[test]
    fn read_response_changed_flag() {
        let resp = ReadResponse::new("hello world", 2, None);

        // A reader holding version 1 observes a change.
        assert!(resp.clone().with_changed_since(Some(1)).changed);
        // A reader already at version 2 does not.
        assert!(!resp.clone().with_changed_since(Some(2)).changed);
        // No known version means the full state is always news.
        assert!(resp.with_changed_since(None).changed);
    }

    #[test]
    fn read_response_is_newer_than() {
        let resp = ReadResponse::new("x", 5, Some(1));
        assert!(resp.is_newer_than(1));
        assert!(!resp.is_newer_than(5));
    }

    #[test]
    fn health_response_ok() {
        let resp = HealthResponse::ok(42);
        let decoded = HealthResponse::decode(&resp.encode().unwrap()).unwrap();

        assert!(decoded.is_ok());
        assert_eq!(decoded.version, 42);
    }

    #[test]
    fn presence_response_roundtrip() {
        let decoded = PresenceResponse::decode(b"{\"count\": 3}").unwrap();
        assert_eq!(decoded.count, 3);
    }

    #[test]
    fn sync_message_type_codes() {
        assert_eq!(
            SyncMessage::WriteRequest(WriteRequest::new("")).type_code(),
            1
        );
        assert_eq!(
            SyncMessage::WriteResponse(WriteResponse::success(0, 0)).type_code(),
            2
        );
        assert_eq!(SyncMessage::ReadRequest(ReadRequest::new()).type_code(), 3);
        assert_eq!(
            SyncMessage::ReadResponse(ReadResponse::new("", 0, None)).type_code(),
            4
        );
        assert_eq!(
            SyncMessage::PresenceRequest(PresenceRequest::new()).type_code(),
            5
        );
        assert_eq!(
            SyncMessage::PresenceResponse(PresenceResponse::new(0)).type_code(),
            6
        );
        assert_eq!(
            SyncMessage::HealthRequest(HealthRequest::new()).type_code(),
            7
        );
        assert_eq!(
            SyncMessage::HealthResponse(HealthResponse::ok(0)).type_code(),
            8
        );
    }

    #[test]
    fn sync_message_request_classification() {
        assert!(SyncMessage::ReadRequest(ReadRequest::new()).is_request());
        assert!(!SyncMessage::ReadResponse(ReadResponse::new("", 0, None)).is_request());
    }
}
