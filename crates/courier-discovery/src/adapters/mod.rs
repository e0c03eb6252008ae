//! # Adapters
//!
//! - `middleware` - reply socket the discovery service listens on
//! - `app` - application object driven by the event loop

pub mod app;
pub mod middleware;

pub use app::{DiscoveryApp, DiscoveryConfig, DiscoveryError, DiscoveryState};
pub use middleware::{DiscoveryIncoming, DiscoveryMiddleware};
