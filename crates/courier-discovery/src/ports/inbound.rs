//! # Driving Port (Inbound API)
//!
//! The operations the discovery service exposes. Every operation answers
//! exactly one inbound request; the service never sends unsolicited
//! messages.

use courier_types::{Endpoint, Role};

use crate::domain::{Participant, RegistrationError, RegistryStats};

/// Primary API of the discovery service.
pub trait DiscoveryApi {
    /// Admit a participant under `role`.
    ///
    /// # Errors
    ///
    /// - `DuplicateId` if the id already exists in the matching bucket
    /// - `BrokerAlreadyRegistered` for a second `Both` registration
    ///
    /// A refused registration leaves the registry untouched.
    fn register(&mut self, role: Role, participant: Participant) -> Result<(), RegistrationError>;

    /// Current readiness. Never changes state.
    fn is_ready(&self) -> bool;

    /// Every registered publisher, topics omitted, in registration order.
    fn lookup_all_publishers(&self) -> Vec<Endpoint>;

    /// Publishers whose topics intersect `topics`, in registration order.
    fn lookup_publishers_by_topic(&self, topics: &[String]) -> Vec<Endpoint>;

    /// Endpoints a subscriber interested in `topics` should connect to under
    /// the configured dissemination mode.
    fn resolve_for_topics(&self, topics: &[String]) -> Vec<Endpoint>;

    /// Bucket sizes and readiness.
    fn stats(&self) -> RegistryStats;
}
