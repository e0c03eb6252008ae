//! Registry Implementation
//!
//! Three insertion-ordered buckets keyed by id:
//!
//! - ids are unique within `publishers` and within `subscribers`, but a
//!   publisher and a subscriber may share one
//! - `brokers` holds at most one entry, and that entry also occupies a
//!   publisher slot and a subscriber slot
//! - readiness is recomputed on registration only and never reverts

use courier_types::{DisseminationMode, Endpoint, Role};

use crate::domain::{Participant, ReadinessConfig, RegistrationError, RegistryStats};

/// The registry owned by the discovery service.
#[derive(Debug, Clone)]
pub struct Registry {
    publishers: Vec<Participant>,
    subscribers: Vec<Participant>,
    brokers: Vec<Participant>,
    config: ReadinessConfig,
    ready: bool,
}

impl Registry {
    /// Empty registry gated by `config`.
    #[must_use]
    pub fn new(config: ReadinessConfig) -> Self {
        let mut registry = Self {
            publishers: Vec::new(),
            subscribers: Vec::new(),
            brokers: Vec::new(),
            config,
            ready: false,
        };
        // zero expected counts are ready before anyone registers
        registry.refresh_readiness();
        registry
    }

    /// Admit `participant` under `role`, or refuse without mutating.
    pub fn register(
        &mut self,
        role: Role,
        participant: Participant,
    ) -> Result<(), RegistrationError> {
        match role {
            Role::Publisher => {
                Self::ensure_unique(&self.publishers, role, participant.id())?;
                self.publishers.push(participant);
            }
            Role::Subscriber => {
                Self::ensure_unique(&self.subscribers, role, participant.id())?;
                self.subscribers.push(participant);
            }
            Role::Both => {
                if let Some(existing) = self.broker() {
                    return Err(RegistrationError::BrokerAlreadyRegistered {
                        existing: existing.id().to_string(),
                    });
                }
                self.publishers.push(participant.clone());
                self.subscribers.push(participant.clone());
                self.brokers.push(participant);
            }
        }
        self.refresh_readiness();
        Ok(())
    }

    fn ensure_unique(
        bucket: &[Participant],
        role: Role,
        id: &str,
    ) -> Result<(), RegistrationError> {
        if bucket.iter().any(|p| p.id() == id) {
            return Err(RegistrationError::DuplicateId {
                role,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn refresh_readiness(&mut self) {
        if self.publishers.len() >= self.config.expected_publishers
            && self.subscribers.len() >= self.config.expected_subscribers
        {
            self.ready = true;
        }
    }

    /// Whether the expected population has registered.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Every publisher (broker included), in registration order.
    #[must_use]
    pub fn lookup_all_publishers(&self) -> Vec<Endpoint> {
        self.publishers.iter().map(|p| p.endpoint.clone()).collect()
    }

    /// Publishers whose topic set intersects `topics`, in registration order.
    #[must_use]
    pub fn lookup_publishers_by_topic(&self, topics: &[String]) -> Vec<Endpoint> {
        self.publishers
            .iter()
            .filter(|p| p.carries_any(topics))
            .map(|p| p.endpoint.clone())
            .collect()
    }

    /// Where a subscriber interested in `topics` should connect.
    ///
    /// - `Direct`: every matching publisher except the broker, which would
    ///   otherwise deliver each message a second time
    /// - `Broker`: the broker, if registered and carrying any of `topics`
    #[must_use]
    pub fn resolve_for_topics(&self, mode: DisseminationMode, topics: &[String]) -> Vec<Endpoint> {
        let broker = self.broker();
        match mode {
            DisseminationMode::Direct => self
                .publishers
                .iter()
                .filter(|p| p.carries_any(topics))
                .filter(|p| broker.map_or(true, |b| b.id() != p.id()))
                .map(|p| p.endpoint.clone())
                .collect(),
            DisseminationMode::Broker => broker
                .filter(|b| b.carries_any(topics))
                .map(|b| vec![b.endpoint.clone()])
                .unwrap_or_default(),
        }
    }

    /// Current broker, if any.
    #[must_use]
    pub fn broker(&self) -> Option<&Participant> {
        self.brokers.first()
    }

    /// Readiness thresholds.
    #[must_use]
    pub fn config(&self) -> ReadinessConfig {
        self.config
    }

    /// Bucket sizes and readiness.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            publishers: self.publishers.len(),
            subscribers: self.subscribers.len(),
            brokers: self.brokers.len(),
            ready: self.ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, port: u16, topics: &[&str]) -> Participant {
        Participant::new(id, "localhost", port, topics.iter().copied())
    }

    fn topics(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    fn ids(endpoints: &[Endpoint]) -> Vec<&str> {
        endpoints.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_duplicate_publisher_rejected_without_mutation() {
        let mut registry = Registry::new(ReadinessConfig::new(5, 5));
        registry
            .register(Role::Publisher, participant("p1", 1, &["a"]))
            .unwrap();
        let before = registry.stats();

        let err = registry
            .register(Role::Publisher, participant("p1", 2, &["b"]))
            .unwrap_err();

        assert_eq!(
            err,
            RegistrationError::DuplicateId {
                role: Role::Publisher,
                id: "p1".into()
            }
        );
        assert_eq!(err.to_string(), "publisher name is not unique");
        assert_eq!(registry.stats(), before);
    }

    #[test]
    fn test_duplicate_subscriber_rejected() {
        let mut registry = Registry::new(ReadinessConfig::new(5, 5));
        registry
            .register(Role::Subscriber, participant("s1", 1, &[]))
            .unwrap();
        let err = registry
            .register(Role::Subscriber, participant("s1", 1, &[]))
            .unwrap_err();
        assert_eq!(err.to_string(), "subscriber name is not unique");
        assert_eq!(registry.stats().subscribers, 1);
    }

    #[test]
    fn test_same_id_allowed_across_buckets() {
        let mut registry = Registry::new(ReadinessConfig::new(5, 5));
        registry
            .register(Role::Publisher, participant("node", 1, &["a"]))
            .unwrap();
        registry
            .register(Role::Subscriber, participant("node", 2, &["a"]))
            .unwrap();
        assert_eq!(registry.stats().publishers, 1);
        assert_eq!(registry.stats().subscribers, 1);
    }

    #[test]
    fn test_only_one_broker() {
        let mut registry = Registry::new(ReadinessConfig::new(5, 5));
        registry
            .register(Role::Both, participant("broker", 1, &["a"]))
            .unwrap();

        let err = registry
            .register(Role::Both, participant("other-broker", 2, &["a"]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::BrokerAlreadyRegistered {
                existing: "broker".into()
            }
        );
        assert_eq!(err.to_string(), "only one broker allowed");
        assert_eq!(registry.stats().brokers, 1);
    }

    #[test]
    fn test_broker_occupies_both_slots() {
        let mut registry = Registry::new(ReadinessConfig::new(1, 1));
        registry
            .register(Role::Both, participant("broker", 1, &["a"]))
            .unwrap();

        assert_eq!(
            registry.stats(),
            RegistryStats {
                publishers: 1,
                subscribers: 1,
                brokers: 1,
                ready: true,
            }
        );
        assert_eq!(registry.broker().map(Participant::id), Some("broker"));
        assert_eq!(ids(&registry.lookup_all_publishers()), vec!["broker"]);
    }

    #[test]
    fn test_readiness_threshold_and_monotonicity() {
        let mut registry = Registry::new(ReadinessConfig::new(2, 1));
        registry
            .register(Role::Publisher, participant("p1", 1, &["a"]))
            .unwrap();
        registry
            .register(Role::Subscriber, participant("s1", 2, &["a"]))
            .unwrap();
        assert!(!registry.is_ready());

        // a refused registration does not flip readiness
        let _ = registry.register(Role::Publisher, participant("p1", 1, &["a"]));
        assert!(!registry.is_ready());

        registry
            .register(Role::Publisher, participant("p2", 3, &["a"]))
            .unwrap();
        assert!(registry.is_ready());
        assert!(registry.is_ready());

        registry
            .register(Role::Subscriber, participant("s2", 4, &["a"]))
            .unwrap();
        assert!(registry.is_ready());
    }

    #[test]
    fn test_zero_expected_counts_are_ready_immediately() {
        let registry = Registry::new(ReadinessConfig::new(0, 0));
        assert!(registry.is_ready());
    }

    #[test]
    fn test_topic_lookup_matches_any_topic() {
        let mut registry = Registry::new(ReadinessConfig::default());
        registry
            .register(Role::Publisher, participant("A", 1, &["a", "b"]))
            .unwrap();
        registry
            .register(Role::Publisher, participant("B", 2, &["c", "d"]))
            .unwrap();
        registry
            .register(Role::Publisher, participant("C", 3, &["x", "y"]))
            .unwrap();

        let found = registry.lookup_publishers_by_topic(&topics(&["b", "c"]));
        assert_eq!(ids(&found), vec!["A", "B"]);
        assert_eq!(found[1], Endpoint::new("B", "localhost", 2));

        assert!(registry
            .lookup_publishers_by_topic(&topics(&["zzz"]))
            .is_empty());
        assert!(registry.lookup_publishers_by_topic(&[]).is_empty());
    }

    #[test]
    fn test_lookup_all_ignores_topics() {
        let mut registry = Registry::new(ReadinessConfig::default());
        assert!(registry.lookup_all_publishers().is_empty());

        registry
            .register(Role::Publisher, participant("A", 1, &["a"]))
            .unwrap();
        registry
            .register(Role::Publisher, participant("C", 3, &[]))
            .unwrap();
        registry
            .register(Role::Subscriber, participant("S", 4, &["a"]))
            .unwrap();

        assert_eq!(ids(&registry.lookup_all_publishers()), vec!["A", "C"]);
    }

    #[test]
    fn test_resolve_direct_mode_skips_the_broker() {
        let mut registry = Registry::new(ReadinessConfig::default());
        registry
            .register(Role::Publisher, participant("A", 1, &["weather"]))
            .unwrap();
        registry
            .register(Role::Both, participant("broker", 9, &["weather", "sound"]))
            .unwrap();

        let found = registry.resolve_for_topics(DisseminationMode::Direct, &topics(&["weather"]));
        assert_eq!(ids(&found), vec!["A"]);
        // the plain lookup still sees the broker's publisher slot
        assert_eq!(
            ids(&registry.lookup_publishers_by_topic(&topics(&["weather"]))),
            vec!["A", "broker"]
        );
        assert!(registry
            .resolve_for_topics(DisseminationMode::Direct, &topics(&["sound"]))
            .is_empty());
    }

    #[test]
    fn test_resolve_broker_mode_returns_only_broker() {
        let mut registry = Registry::new(ReadinessConfig::default());
        registry
            .register(Role::Publisher, participant("A", 1, &["weather"]))
            .unwrap();

        // broker not registered yet
        assert!(registry
            .resolve_for_topics(DisseminationMode::Broker, &topics(&["weather"]))
            .is_empty());

        registry
            .register(Role::Both, participant("broker", 9, &["weather"]))
            .unwrap();
        let found = registry.resolve_for_topics(DisseminationMode::Broker, &topics(&["weather"]));
        assert_eq!(found, vec![Endpoint::new("broker", "localhost", 9)]);

        assert!(registry
            .resolve_for_topics(DisseminationMode::Broker, &topics(&["sound"]))
            .is_empty());
    }
}
