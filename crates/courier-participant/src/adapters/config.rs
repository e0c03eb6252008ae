//! Startup parameters shared by publishers and subscribers.

use courier_types::{DisseminationMode, Endpoint};
use std::time::Duration;

/// Pause between readiness polls unless configured otherwise.
pub const DEFAULT_READY_BACKOFF: Duration = Duration::from_secs(10);

/// Silence after the last received message that ends a subscriber.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Startup parameters of a publisher or subscriber.
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Our name, unique within the role.
    pub name: String,
    /// Host advertised to discovery.
    pub addr: String,
    /// Port advertised to discovery; 0 advertises the port actually bound.
    pub port: u16,
    /// Lookup strategy name from the config file.
    pub lookup: String,
    /// Dissemination mode from the config file.
    pub dissemination: DisseminationMode,
    /// Topic interests.
    pub topics: Vec<String>,
    /// Publisher: rounds to publish. Subscriber: messages to receive.
    pub iters: usize,
    /// Publisher: rounds per second. Subscriber: informational.
    pub frequency: u32,
    /// Pause between readiness polls.
    pub ready_backoff: Duration,
    /// Subscriber: finish once nothing arrives for this long after the
    /// last message. `None` waits for the full quota.
    pub idle_timeout: Option<Duration>,
}

impl ParticipantConfig {
    /// Defaults for a participant called `name` interested in `topics`.
    pub fn new(name: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            addr: "localhost".to_string(),
            port: 0,
            lookup: "Centralized".to_string(),
            dissemination: DisseminationMode::Direct,
            topics,
            iters: 1000,
            frequency: 1,
            ready_backoff: DEFAULT_READY_BACKOFF,
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
        }
    }

    /// Endpoint advertised to discovery, given the port actually bound.
    #[must_use]
    pub fn advertised(&self, bound_port: u16) -> Endpoint {
        let port = match self.port {
            0 => bound_port,
            port => port,
        };
        Endpoint::new(self.name.clone(), self.addr.clone(), port)
    }
}
