//! # Core Entities
//!
//! Participants are identified by a name unique within their role bucket
//! and reachable at an advertised address and port.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ProtocolError;

/// Role a participant registers under.
///
/// `Both` denotes the broker, which occupies a publisher slot and a
/// subscriber slot at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A data source.
    Publisher,
    /// A data sink.
    Subscriber,
    /// The broker (publisher and subscriber at once).
    Both,
}

impl Role {
    /// Human-readable label used in registration replies.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Subscriber => "subscriber",
            Self::Both => "broker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Network identity of a participant, without its topic interests.
///
/// This is what lookups return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Name, unique within the role bucket.
    pub id: String,
    /// Advertised host or IP address.
    pub addr: String,
    /// Advertised TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(id: impl Into<String>, addr: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            addr: addr.into(),
            port,
        }
    }

    /// `host:port` form used for TCP connects.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.addr, self.port)
    }
}

/// Whether subscribers receive data directly from publishers or only
/// through the broker.
///
/// Read once at startup and shared by every role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisseminationMode {
    /// Subscribers connect to every matching publisher.
    #[default]
    Direct,
    /// Subscribers connect to the broker only.
    Broker,
}

impl FromStr for DisseminationMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("direct") {
            Ok(Self::Direct)
        } else if s.eq_ignore_ascii_case("broker") {
            Ok(Self::Broker)
        } else {
            Err(ProtocolError::UnknownDissemination(s.to_string()))
        }
    }
}

impl fmt::Display for DisseminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct"),
            Self::Broker => f.write_str("Broker"),
        }
    }
}
