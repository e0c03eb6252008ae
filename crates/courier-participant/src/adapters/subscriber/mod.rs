//! Subscriber role.

pub mod app;
pub mod middleware;

pub use app::{SubscriberApp, SubscriberError};
pub use middleware::{SubscriberIncoming, SubscriberMiddleware};
