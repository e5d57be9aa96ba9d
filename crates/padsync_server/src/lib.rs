//! # padsync Server
//!
//! Shared-document sync server for padsync.
//!
//! This crate provides:
//! - The in-memory document store (content + version + timestamp)
//! - Presence tracking (best-effort active-client count)
//! - Request handlers for the sync protocol
//! - An HTTP binding (axum) over the handlers
//!
//! # Architecture
//!
//! The server holds exactly one document in process memory, guarded by a
//! monotonic version counter. Writes replace the content wholesale and
//! bump the version by one; reads always return the full current state
//! and leave the "did anything change" comparison to the caller. There
//! is no persistence: the document resets with the process.
//!
//! # Example
//!
//! ```
//! use padsync_server::{ServerConfig, SyncServer};
//! use padsync_protocol::{ReadRequest, WriteRequest};
//!
//! let server = SyncServer::new(ServerConfig::default());
//!
//! let written = server.handle_write(WriteRequest::new("hello")).unwrap();
//! assert_eq!(written.version, 1);
//!
//! let read = server.handle_read(ReadRequest::new());
//! assert_eq!(read.content, "hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
pub mod http;
mod presence;
mod server;
mod store;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use presence::PresenceTracker;
pub use server::SyncServer;
pub use store::{epoch_millis, DocumentSnapshot, DocumentStore};
