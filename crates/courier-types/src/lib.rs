//! # Courier Types Crate
//!
//! This crate contains the data contract exchanged between every pair of
//! roles (discovery, broker, publisher, subscriber). It holds no logic
//! beyond encoding and decoding.
//!
//! ## Contents
//!
//! - **Entities**: `Role`, `Endpoint`, `DisseminationMode`
//! - **IPC**: `DiscoveryRequest` / `DiscoveryResponse` control-plane envelopes
//! - **Publication**: the colon-delimited data-plane text format and its
//!   wall-clock timestamps
//!
//! ## Design Principles
//!
//! - **One discriminator per envelope**: each request and response is a
//!   closed enum; an unknown variant on the wire is a decode failure.
//! - **Strict alternation**: a peer never sends a second request before the
//!   reply to the first (enforced by the transport, not here).

pub mod entities;
pub mod errors;
pub mod ipc;
pub mod publication;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
pub use publication::*;

/// Topic catalogue every role draws its interests from.
///
/// The broker registers with the whole catalogue so it can relay everything.
pub const TOPIC_CATALOGUE: [&str; 9] = [
    "weather",
    "humidity",
    "airquality",
    "light",
    "pressure",
    "temperature",
    "sound",
    "altitude",
    "location",
];
