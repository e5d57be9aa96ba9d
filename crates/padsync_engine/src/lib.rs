//! # padsync Sync Engine
//!
//! Client-side sync engine for padsync.
//!
//! This crate provides:
//! - Poll/push state machine over the shared document
//! - Version-token change detection (apply a remote snapshot iff its
//!   version differs from the locally tracked one)
//! - HTTP transport abstraction with a loopback client for tests
//! - Retry policy with exponential backoff
//!
//! ## Architecture
//!
//! The engine mirrors what a polling page script does: periodically read
//! the full server state and adopt it when the version token moved, and
//! push local edits with the last known version as an informational
//! hint. The server is authoritative and never rejects a write for a
//! stale hint (last-writer-wins), so the engine's only reconciliation
//! step is adopting whatever the server returns.
//!
//! The engine performs no background scheduling of its own; cadence
//! defaults (poll interval, write debounce) live in [`SyncConfig`] for
//! the embedding layer to honor.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod state;
mod transport;

pub use config::{RetryConfig, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpTransport, LoopbackClient, LoopbackServer};
pub use state::{DocumentSink, MemorySink, PollOutcome, SyncEngine, SyncState, SyncStats};
pub use transport::{MockTransport, SyncTransport};
