use courier_types::{DiscoveryRequest, DiscoveryResponse, RegisterResponse};
use tracing::debug;

use crate::domain::Participant;
use crate::ports::DiscoveryApi;
use crate::service::DiscoveryService;

impl DiscoveryService {
    /// Answer one control-plane request.
    ///
    /// Registration conflicts become a `Failure` reply; nothing here fails
    /// the discovery process.
    pub fn handle_request(&mut self, request: DiscoveryRequest) -> DiscoveryResponse {
        debug!(message = ?request.message_type(), "Handling discovery request");
        match request {
            DiscoveryRequest::Register(reg) => {
                let role = reg.role;
                let participant = Participant::from_registration(reg.info, reg.topics);
                let reply = match self.register(role, participant) {
                    Ok(()) => RegisterResponse::success(format!("{role} name is unique")),
                    Err(e) => RegisterResponse::failure(e.to_string()),
                };
                DiscoveryResponse::Register(reply)
            }
            DiscoveryRequest::IsReady => DiscoveryResponse::IsReady {
                status: self.is_ready(),
            },
            DiscoveryRequest::LookupAllPublishers => DiscoveryResponse::LookupAllPublishers {
                publishers: self.lookup_all_publishers(),
            },
            DiscoveryRequest::LookupPublishersByTopic { topics } => {
                DiscoveryResponse::LookupPublishersByTopic {
                    publishers: self.resolve_for_topics(&topics),
                }
            }
        }
    }
}
