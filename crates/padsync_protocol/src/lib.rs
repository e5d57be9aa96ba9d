//! # padsync Sync Protocol
//!
//! Protocol types and JSON codecs for padsync.
//!
//! This crate provides:
//! - Request/response messages for the shared-document sync protocol
//!   (write, read, presence, health)
//! - JSON encoding/decoding for every message
//! - `SyncMessage` envelope for transport-agnostic dispatch
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod messages;

pub use codec::{CodecError, CodecResult};
pub use messages::{
    HealthRequest, HealthResponse, PresenceRequest, PresenceResponse, ReadRequest, ReadResponse,
    SyncMessage, WriteRequest, WriteResponse, PROTOCOL_VERSION,
};
