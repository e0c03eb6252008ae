//! # Transport Errors
//!
//! Transport failures are never retried: they propagate to the process
//! entry point, get logged, and the process exits.

use courier_types::ProtocolError;
use thiserror::Error;

/// Errors from sockets and the discovery client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not bind a listening socket.
    #[error("Failed to bind {addr}: {error}")]
    Bind { addr: String, error: String },

    /// Could not connect to a peer.
    #[error("Failed to connect to {addr}: {error}")]
    Connect { addr: String, error: String },

    /// Read or write failure on an established connection.
    #[error("I/O error: {0}")]
    Io(String),

    /// The peer or the socket's background task went away.
    #[error("Connection closed")]
    Closed,

    /// A second request was sent before the reply to the first arrived.
    #[error("A request is already awaiting its reply")]
    RequestPending,

    /// A reply was awaited (or sent) with no request outstanding.
    #[error("No request is outstanding")]
    NoPendingRequest,

    /// A new request was taken before the previous one was answered.
    #[error("The previous request has not been answered")]
    ReplyPending,

    /// A frame exceeded [`crate::MAX_FRAME_LEN`].
    #[error("Frame of {0} bytes exceeds the maximum")]
    FrameTooLarge(usize),

    /// The control-plane payload violated the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
