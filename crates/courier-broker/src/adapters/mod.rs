//! # Adapters
//!
//! - `middleware` - discovery request socket plus the SUB and PUB data sockets
//! - `app` - application object driven by the event loop

pub mod app;
pub mod middleware;

pub use app::{BrokerApp, BrokerConfig, BrokerError};
pub use middleware::BrokerMiddleware;
