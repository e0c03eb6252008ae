//! # Courier Broker
//!
//! The single logical subscriber to every publisher and the single logical
//! publisher to every subscriber. Subscribers depend on one stable fan-in
//! point instead of N publisher endpoints.
//!
//! ## Lifecycle
//!
//! ```text
//! Initialize → Configure → Register → IsReady ⟲ → CheckMsg
//!     → ReceiveFromPub (buffer `iters` messages)
//!     → Disseminate (one relayed message per pacing tick)
//!     → Completed
//! ```
//!
//! Every relayed message carries the `:(from broker)` provenance marker and
//! leaves in arrival order.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;

pub use adapters::{BrokerApp, BrokerConfig, BrokerError, BrokerMiddleware};
pub use domain::{BrokerEvent, BrokerState, RelayBuffer, TransitionError};
