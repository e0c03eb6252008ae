//! # Ports Layer
//!
//! - **Driving Port (Inbound):** [`DiscoveryApi`], what the control-plane
//!   adapter calls into

pub mod inbound;

pub use inbound::DiscoveryApi;
