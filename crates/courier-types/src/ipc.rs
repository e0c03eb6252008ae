//! # IPC Message Payloads
//!
//! Control-plane envelopes exchanged with the discovery service.
//!
//! | Message type | Request payload | Response payload |
//! |---|---|---|
//! | `Register` | `{role, info, topics}` | `{status, reason}` |
//! | `IsReady` | `{}` | `{status: bool}` |
//! | `LookupAllPubs` | `{}` | `{publishers}` |
//! | `LookupPubByTopic` | `{topics}` | `{publishers}` |
//!
//! Every envelope is encoded with `bincode`; the variant index is the
//! discriminator, so an unrecognised message type or role tag fails to
//! decode and surfaces as [`ProtocolError::Malformed`].

use serde::{Deserialize, Serialize};

use crate::entities::{Endpoint, Role};
use crate::errors::ProtocolError;

/// Discriminator shared by requests and their responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Register,
    IsReady,
    LookupAllPubs,
    LookupPubByTopic,
}

/// Outcome of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Failure,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Role bucket the participant joins.
    pub role: Role,
    /// Name and advertised endpoint.
    pub info: Endpoint,
    /// Declared topic interests.
    pub topics: Vec<String>,
}

/// A request sent to the discovery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryRequest {
    /// Join the registry.
    Register(RegisterRequest),
    /// Ask whether the expected population has registered.
    IsReady,
    /// Ask for every registered publisher (used by the broker).
    LookupAllPublishers,
    /// Ask for publishers carrying any of these topics.
    LookupPublishersByTopic {
        /// Topics of interest.
        topics: Vec<String>,
    },
}

impl DiscoveryRequest {
    /// The discriminator of this request.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Register(_) => MessageType::Register,
            Self::IsReady => MessageType::IsReady,
            Self::LookupAllPublishers => MessageType::LookupAllPubs,
            Self::LookupPublishersByTopic { .. } => MessageType::LookupPubByTopic,
        }
    }

    /// Serialize to a frame body.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        bincode::serialize(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Deserialize from a frame body.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        bincode::deserialize(bytes).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Registration reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Whether the participant was admitted.
    pub status: Status,
    /// Human-readable explanation (e.g. "publisher name is not unique").
    pub reason: String,
}

impl RegisterResponse {
    /// Successful registration.
    pub fn success(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            reason: reason.into(),
        }
    }

    /// Rejected registration.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            reason: reason.into(),
        }
    }

    /// True when `status` is `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// A reply from the discovery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryResponse {
    Register(RegisterResponse),
    IsReady {
        /// Current readiness.
        status: bool,
    },
    LookupAllPublishers {
        /// Every registered publisher, in registration order.
        publishers: Vec<Endpoint>,
    },
    LookupPublishersByTopic {
        /// Matching publishers, in registration order.
        publishers: Vec<Endpoint>,
    },
}

impl DiscoveryResponse {
    /// The discriminator of this response.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Register(_) => MessageType::Register,
            Self::IsReady { .. } => MessageType::IsReady,
            Self::LookupAllPublishers { .. } => MessageType::LookupAllPubs,
            Self::LookupPublishersByTopic { .. } => MessageType::LookupPubByTopic,
        }
    }

    /// Serialize to a frame body.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        bincode::serialize(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Deserialize from a frame body.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        bincode::deserialize(bytes).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_survives_the_wire() {
        let req = DiscoveryRequest::Register(RegisterRequest {
            role: Role::Both,
            info: Endpoint::new("broker", "localhost", 5578),
            topics: vec!["weather".into(), "sound".into()],
        });
        let bytes = req.encode().unwrap();
        assert_eq!(DiscoveryRequest::decode(&bytes).unwrap(), req);
        assert_eq!(req.message_type(), MessageType::Register);
    }

    #[test]
    fn test_unknown_discriminator_is_malformed() {
        // bincode encodes the enum variant as a little-endian u32 index.
        let bytes = 42u32.to_le_bytes();
        assert!(matches!(
            DiscoveryRequest::decode(&bytes),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_role_tag_is_malformed() {
        let req = DiscoveryRequest::Register(RegisterRequest {
            role: Role::Publisher,
            info: Endpoint::new("p", "h", 1),
            topics: vec![],
        });
        let mut bytes = req.encode().unwrap();
        // variant index (4 bytes) then the role index (4 bytes)
        bytes[4..8].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            DiscoveryRequest::decode(&bytes),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_response_message_types_match_requests() {
        let resp = DiscoveryResponse::LookupPublishersByTopic { publishers: vec![] };
        let req = DiscoveryRequest::LookupPublishersByTopic { topics: vec![] };
        assert_eq!(resp.message_type(), req.message_type());
        assert!(RegisterResponse::success("ok").is_success());
        assert!(!RegisterResponse::failure("no").is_success());
    }
}
