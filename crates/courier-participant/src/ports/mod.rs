//! # Ports Layer
//!
//! - **Driven Port (Outbound):** [`LatencySink`], where subscribers persist
//!   latency records

pub mod outbound;

pub use outbound::LatencySink;
