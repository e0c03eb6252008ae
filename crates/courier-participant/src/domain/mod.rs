//! Domain Layer - participant lifecycles, topic selection, latency records

pub mod latency;
pub mod state;
pub mod topics;

pub use latency::LatencyRecord;
pub use state::{
    PublisherEvent, PublisherState, SubscriberEvent, SubscriberState, TransitionError,
};
pub use topics::TopicSelector;
