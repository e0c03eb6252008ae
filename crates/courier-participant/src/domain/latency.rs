//! Per-message latency records.
//!
//! Field names on the wire match the analytics files earlier runs
//! produced, so existing notebooks keep working.

use courier_types::{Publication, WallClock};
use serde::Serialize;

/// One received message with its send and receipt stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyRecord {
    pub pub_id: String,
    pub topic: String,
    #[serde(rename = "disseminationdata")]
    pub data: String,
    pub sent_time: String,
    pub sub_id: String,
    pub received_time: String,
    #[serde(rename = "Num_topics_subscribed")]
    pub num_topics: usize,
    /// Receipt minus send stamp; negative under clock skew.
    #[serde(rename = "latency")]
    pub latency_ms: i64,
    #[serde(rename = "receivedFromBroker")]
    pub from_broker: bool,
}

impl LatencyRecord {
    /// Record `publication` as received by `sub_id` at `received_at`.
    #[must_use]
    pub fn new(
        publication: &Publication,
        sub_id: &str,
        num_topics: usize,
        received_at: WallClock,
    ) -> Self {
        Self {
            pub_id: publication.publisher_id.clone(),
            topic: publication.topic.clone(),
            data: publication.payload.clone(),
            sent_time: publication.sent_at.to_string(),
            sub_id: sub_id.to_string(),
            received_time: received_at.to_string(),
            num_topics,
            latency_ms: publication.latency_ms(&received_at),
            from_broker: publication.from_broker,
        }
    }
}
