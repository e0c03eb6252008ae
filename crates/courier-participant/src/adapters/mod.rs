//! # Adapters
//!
//! Middleware and application objects for both participant roles.

pub mod config;
pub mod publisher;
pub mod subscriber;

pub use config::ParticipantConfig;
pub use publisher::{PublisherApp, PublisherError, PublisherMiddleware};
pub use subscriber::{SubscriberApp, SubscriberError, SubscriberMiddleware};
