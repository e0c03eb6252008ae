//! # Courier Reactor - Cooperative Event Loop and Socket Transport
//!
//! Every role (discovery, broker, publisher, subscriber) embeds the same
//! reactive core: a single-threaded loop that waits on its endpoints with a
//! caller-supplied timeout and makes exactly one upcall per iteration.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │          EventLoop           │
//!            │  wait(endpoints, timeout)    │
//!            └──────┬───────────────┬───────┘
//!         readable  │               │  elapsed
//!                   ▼               ▼
//!     Reactor::handle_incoming   Reactor::invoke_operation
//!                   │               │
//!                   └──► next Timeout ◄──┘
//! ```
//!
//! ## Transport
//!
//! The [`transport`] module provides the four socket flavours the roles
//! need (request, reply, publish, subscribe) over plain TCP, all created
//! from an explicitly owned [`TransportContext`].

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod error;
pub mod event_loop;
pub mod timeout;
pub mod transport;

// Re-export main types
pub use client::DiscoveryClient;
pub use error::TransportError;
pub use event_loop::{EventLoop, LoopHandle, LoopStats, Middleware, Reactor};
pub use timeout::Timeout;
pub use transport::{
    PublishSocket, ReplySocket, RequestSocket, SubscribeSocket, TransportContext,
};

/// Messages buffered per publish socket before slow subscribers lag.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Largest frame body accepted from the wire.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
