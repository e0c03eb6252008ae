//! # Error Types
//!
//! Protocol violations are fatal for the process that observes them.

use thiserror::Error;

use crate::ipc::MessageType;

/// Errors raised while encoding, decoding or interpreting wire messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A control-plane frame could not be decoded (unknown message type or
    /// role tag, truncated payload).
    #[error("Malformed message: {0}")]
    Malformed(String),

    /// A control-plane message could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The reply variant does not answer the outstanding request.
    #[error("Unexpected reply: expected {expected:?}, received {received:?}")]
    UnexpectedReply {
        expected: MessageType,
        received: MessageType,
    },

    /// A data-plane message is not `topic:publisher:payload:timestamp`.
    #[error("Malformed publication: {0:?}")]
    MalformedPublication(String),

    /// A timestamp is not `HH-MM-SS-mmm`.
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Dissemination strategy is neither `Direct` nor `Broker`.
    #[error("Unknown dissemination strategy: {0}")]
    UnknownDissemination(String),
}
