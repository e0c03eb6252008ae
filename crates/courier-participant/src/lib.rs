//! # Courier Participants
//!
//! Lifecycles of the two plain roles, both driven by the shared event loop:
//!
//! - **Publisher:** `Register → IsReady → Disseminate → Completed`
//! - **Subscriber:** `Register → IsReady → CheckMsg → Receive → Completed`
//!
//! A subscriber asks discovery for the endpoints carrying its topics and
//! subscribes to each one with a per-topic filter, so an endpoint carrying
//! many topics only delivers the ones asked for. Every received message is
//! stamped on arrival and kept as a [`LatencyRecord`].

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{
    ParticipantConfig, PublisherApp, PublisherError, PublisherMiddleware, SubscriberApp,
    SubscriberError, SubscriberMiddleware,
};
pub use domain::{
    LatencyRecord, PublisherEvent, PublisherState, SubscriberEvent, SubscriberState,
    TopicSelector, TransitionError,
};
pub use ports::LatencySink;
