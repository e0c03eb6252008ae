use courier_types::{Endpoint, Role};
use tracing::{info, warn};

use crate::domain::{Participant, RegistrationError, RegistryStats};
use crate::ports::DiscoveryApi;
use crate::service::DiscoveryService;

impl DiscoveryApi for DiscoveryService {
    fn register(&mut self, role: Role, participant: Participant) -> Result<(), RegistrationError> {
        let id = participant.endpoint.id.clone();
        match self.registry.register(role, participant) {
            Ok(()) => {
                let stats = self.registry.stats();
                info!(
                    %role,
                    %id,
                    publishers = stats.publishers,
                    subscribers = stats.subscribers,
                    ready = stats.ready,
                    "Participant registered"
                );
                Ok(())
            }
            Err(e) => {
                warn!(%role, %id, reason = %e, "Registration refused");
                Err(e)
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.registry.is_ready()
    }

    fn lookup_all_publishers(&self) -> Vec<Endpoint> {
        self.registry.lookup_all_publishers()
    }

    fn lookup_publishers_by_topic(&self, topics: &[String]) -> Vec<Endpoint> {
        self.registry.lookup_publishers_by_topic(topics)
    }

    fn resolve_for_topics(&self, topics: &[String]) -> Vec<Endpoint> {
        self.registry.resolve_for_topics(self.mode, topics)
    }

    fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }
}
