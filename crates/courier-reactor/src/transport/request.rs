//! # Request Socket
//!
//! Client side of a request/reply channel. A peer must not send a second
//! request before it has received the reply to the first; the socket
//! enforces that locally.

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::frame::{read_frame, write_frame};
use super::TransportContext;
use crate::error::TransportError;

type Reply = Result<Vec<u8>, TransportError>;

/// Strict-alternation request socket connected to one peer.
#[derive(Debug)]
pub struct RequestSocket {
    peer: String,
    writer: OwnedWriteHalf,
    replies: mpsc::Receiver<Reply>,
    awaiting: bool,
}

impl RequestSocket {
    /// Connect to `addr` (`host:port`).
    pub async fn connect(ctx: &TransportContext, addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::Connect {
                addr: addr.to_string(),
                error: e.to_string(),
            })?;
        stream.set_nodelay(true)?;
        let (mut reader, writer) = stream.into_split();

        let (tx, replies) = mpsc::channel::<Reply>(1);
        let mut signal = ctx.signal();
        let peer = addr.to_string();
        let task_peer = peer.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = signal.wait() => break,
                    frame = read_frame(&mut reader) => {
                        let (reply, done) = match frame {
                            Ok(Some(body)) => (Ok(body), false),
                            Ok(None) => (Err(TransportError::Closed), true),
                            Err(e) => (Err(e), true),
                        };
                        if tx.send(reply).await.is_err() || done {
                            break;
                        }
                    }
                }
            }
            debug!(peer = %task_peer, "Request socket reader stopped");
        });

        debug!(peer = %peer, "Request socket connected");
        Ok(Self {
            peer,
            writer,
            replies,
            awaiting: false,
        })
    }

    /// Send one request.
    pub async fn send(&mut self, body: &[u8]) -> Result<(), TransportError> {
        if self.awaiting {
            return Err(TransportError::RequestPending);
        }
        write_frame(&mut self.writer, body).await?;
        self.awaiting = true;
        Ok(())
    }

    /// Receive the reply to the outstanding request.
    pub async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        if !self.awaiting {
            return Err(TransportError::NoPendingRequest);
        }
        self.poll_reply().await
    }

    /// Like [`Self::recv`], but never resolves while no request is
    /// outstanding, so it can sit in a multiplexed wait next to other
    /// endpoints. Cancel-safe.
    pub async fn poll_reply(&mut self) -> Result<Vec<u8>, TransportError> {
        if !self.awaiting {
            return std::future::pending().await;
        }
        let reply = match self.replies.recv().await {
            Some(reply) => reply,
            None => Err(TransportError::Closed),
        };
        self.awaiting = false;
        if let Err(e) = &reply {
            warn!(peer = %self.peer, error = %e, "Request socket failed");
        }
        reply
    }
}
