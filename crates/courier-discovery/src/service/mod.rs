//! # Discovery Service
//!
//! Implements [`crate::ports::DiscoveryApi`] over the domain registry and
//! translates control-plane envelopes into calls on it.

mod api;
mod core;
mod dispatch;

pub use self::core::DiscoveryService;
