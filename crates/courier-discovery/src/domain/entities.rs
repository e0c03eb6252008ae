//! Registry entities.

use courier_types::Endpoint;
use std::collections::BTreeSet;

/// A registered publisher, subscriber or broker.
///
/// Created on a successful registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Name and advertised address.
    pub endpoint: Endpoint,
    /// Declared topic interests.
    pub topics: BTreeSet<String>,
}

impl Participant {
    /// Create a participant from its parts.
    pub fn new<I, S>(id: impl Into<String>, addr: impl Into<String>, port: u16, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoint: Endpoint::new(id, addr, port),
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a participant from a registration payload.
    #[must_use]
    pub fn from_registration(endpoint: Endpoint, topics: Vec<String>) -> Self {
        Self {
            endpoint,
            topics: topics.into_iter().collect(),
        }
    }

    /// Name, unique within its bucket.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.endpoint.id
    }

    /// True when this participant carries at least one of `topics`.
    #[must_use]
    pub fn carries_any(&self, topics: &[String]) -> bool {
        topics.iter().any(|t| self.topics.contains(t))
    }
}

/// Expected population that gates readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    /// Publishers required before the system is ready.
    pub expected_publishers: usize,
    /// Subscribers required before the system is ready.
    pub expected_subscribers: usize,
}

impl ReadinessConfig {
    /// Readiness after `publishers` publishers and `subscribers` subscribers.
    #[must_use]
    pub fn new(publishers: usize, subscribers: usize) -> Self {
        Self {
            expected_publishers: publishers,
            expected_subscribers: subscribers,
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Snapshot of bucket sizes and readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Entries in the publisher bucket (broker included).
    pub publishers: usize,
    /// Entries in the subscriber bucket (broker included).
    pub subscribers: usize,
    /// Entries in the broker bucket (0 or 1).
    pub brokers: usize,
    /// Current readiness.
    pub ready: bool,
}
