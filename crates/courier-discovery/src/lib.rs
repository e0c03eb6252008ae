//! # Courier Discovery Service
//!
//! Owns the registry of participants, enforces uniqueness and cardinality
//! rules, computes global readiness and answers roster and topic lookups.
//!
//! ## Architecture
//!
//! Hexagonal layout:
//! - **Domain Layer:** `Registry` with its three buckets and readiness rule
//! - **Ports Layer:** `DiscoveryApi`, the driving port
//! - **Service Layer:** `DiscoveryService`, wiring the registry to the
//!   control-plane envelopes
//! - **Adapters Layer:** reply-socket middleware and the event-loop
//!   application object
//!
//! ## Example
//!
//! ```rust
//! use courier_discovery::{DiscoveryApi, DiscoveryService, Participant, ReadinessConfig};
//! use courier_types::{DisseminationMode, Role};
//!
//! let mut service = DiscoveryService::new(ReadinessConfig::new(1, 1), DisseminationMode::Direct);
//! service
//!     .register(Role::Publisher, Participant::new("p1", "localhost", 5577, ["weather"]))
//!     .unwrap();
//! assert!(!service.is_ready());
//! service
//!     .register(Role::Subscriber, Participant::new("s1", "localhost", 5588, ["weather"]))
//!     .unwrap();
//! assert!(service.is_ready());
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{DiscoveryApp, DiscoveryConfig, DiscoveryError, DiscoveryMiddleware, DiscoveryState};
pub use domain::{Participant, ReadinessConfig, RegistrationError, Registry, RegistryStats};
pub use ports::DiscoveryApi;
pub use service::DiscoveryService;
