//! # Data-Plane Publications
//!
//! Data-plane messages are plain text, not control-plane envelopes:
//!
//! ```text
//! topic:publisherId:payload:HH-MM-SS-mmm[:(from broker)]
//! ```
//!
//! Timestamps are local wall-clock times of day, so latencies computed
//! across processes carry clock-skew error and wrap at midnight.

use chrono::{Local, NaiveTime};
use std::fmt;

use crate::errors::ProtocolError;

/// Suffix the broker appends to every relayed message.
pub const PROVENANCE_MARKER: &str = ":(from broker)";

const TIMESTAMP_FORMAT: &str = "%H-%M-%S-%3f";

/// Wall-clock time of day with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallClock(NaiveTime);

impl WallClock {
    /// Current local time.
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().time())
    }

    /// Build from hour, minute, second and millisecond.
    #[must_use]
    pub fn from_hms_milli(hour: u32, min: u32, sec: u32, milli: u32) -> Option<Self> {
        NaiveTime::from_hms_milli_opt(hour, min, sec, milli).map(Self)
    }

    /// Parse `HH-MM-SS-mmm`.
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        NaiveTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| ProtocolError::MalformedTimestamp(s.to_string()))
    }

    /// Signed milliseconds from `earlier` to `self`.
    #[must_use]
    pub fn millis_since(&self, earlier: &WallClock) -> i64 {
        self.0.signed_duration_since(earlier.0).num_milliseconds()
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// One data-plane message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Topic name; also the subscription-filter prefix.
    pub topic: String,
    /// Id of the originating publisher.
    pub publisher_id: String,
    /// Opaque payload text.
    pub payload: String,
    /// Send time stamped by the originating publisher.
    pub sent_at: WallClock,
    /// Whether the broker relayed this message.
    pub from_broker: bool,
}

impl Publication {
    /// Create a fresh publication stamped with the current time.
    pub fn new(
        topic: impl Into<String>,
        publisher_id: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            publisher_id: publisher_id.into(),
            payload: payload.into(),
            sent_at: WallClock::now(),
            from_broker: false,
        }
    }

    /// Parse a received text message.
    ///
    /// The payload may itself contain `:`; the first two fields and the
    /// last (after stripping the provenance marker) are positional.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let (body, from_broker) = match text.strip_suffix(PROVENANCE_MARKER) {
            Some(body) => (body, true),
            None => (text, false),
        };

        let mut head = body.splitn(3, ':');
        let (Some(topic), Some(publisher_id), Some(rest)) = (head.next(), head.next(), head.next())
        else {
            return Err(ProtocolError::MalformedPublication(text.to_string()));
        };
        let Some((payload, stamp)) = rest.rsplit_once(':') else {
            return Err(ProtocolError::MalformedPublication(text.to_string()));
        };

        Ok(Self {
            topic: topic.to_string(),
            publisher_id: publisher_id.to_string(),
            payload: payload.to_string(),
            sent_at: WallClock::parse(stamp)?,
            from_broker,
        })
    }

    /// Milliseconds between the send stamp and `received_at`.
    #[must_use]
    pub fn latency_ms(&self, received_at: &WallClock) -> i64 {
        received_at.millis_since(&self.sent_at)
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.topic, self.publisher_id, self.payload, self.sent_at
        )?;
        if self.from_broker {
            f.write_str(PROVENANCE_MARKER)?;
        }
        Ok(())
    }
}

/// Append the provenance marker to an already-encoded message.
#[must_use]
pub fn mark_relayed(message: &str) -> String {
    format!("{message}{PROVENANCE_MARKER}")
}
