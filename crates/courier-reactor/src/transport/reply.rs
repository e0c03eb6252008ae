//! # Reply Socket
//!
//! Server side of request/reply. Accepts any number of peers; each
//! [`ReplySocket::recv`] yields the next request from whichever peer sent
//! one, and the following [`ReplySocket::send`] answers that peer.

use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::frame::{read_frame, write_frame};
use super::{ShutdownSignal, TransportContext};
use crate::error::TransportError;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// One request travelling from a connection task to the socket owner.
#[derive(Debug)]
struct InboundRequest {
    peer: SocketAddr,
    body: Vec<u8>,
    reply: oneshot::Sender<Vec<u8>>,
}

/// Bound reply socket.
#[derive(Debug)]
pub struct ReplySocket {
    local_addr: SocketAddr,
    requests: mpsc::Receiver<InboundRequest>,
    pending: Option<(SocketAddr, oneshot::Sender<Vec<u8>>)>,
}

impl ReplySocket {
    /// Bind on `addr` and start accepting peers.
    pub async fn bind(ctx: &TransportContext, addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TransportError::Bind {
                addr: addr.to_string(),
                error: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;
        let (tx, requests) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        let mut signal = ctx.signal();
        let task_signal = ctx.signal();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = signal.wait() => break,
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "Reply socket accepted peer");
                            tokio::spawn(serve_peer(stream, peer, tx.clone(), task_signal.clone()));
                        }
                        Err(e) => warn!(error = %e, "Reply socket accept failed"),
                    }
                }
            }
        });

        info!(addr = %local_addr, "Reply socket bound");
        Ok(Self {
            local_addr,
            requests,
            pending: None,
        })
    }

    /// Address actually bound (useful with port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next request from any peer. Cancel-safe.
    pub async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        if self.pending.is_some() {
            return Err(TransportError::ReplyPending);
        }
        let request = self.requests.recv().await.ok_or(TransportError::Closed)?;
        self.pending = Some((request.peer, request.reply));
        Ok(request.body)
    }

    /// Answer the request most recently returned by [`Self::recv`].
    ///
    /// A peer that disconnected before its answer is logged and skipped.
    pub fn send(&mut self, body: Vec<u8>) -> Result<(), TransportError> {
        let (peer, reply) = self.pending.take().ok_or(TransportError::NoPendingRequest)?;
        if reply.send(body).is_err() {
            warn!(%peer, "Peer disconnected before its reply");
        }
        Ok(())
    }
}

/// Read requests from one peer; at most one is in flight at a time.
async fn serve_peer(
    stream: TcpStream,
    peer: SocketAddr,
    requests: mpsc::Sender<InboundRequest>,
    mut signal: ShutdownSignal,
) {
    let (mut reader, mut writer) = stream.into_split();
    loop {
        let body = tokio::select! {
            _ = signal.wait() => break,
            frame = read_frame(&mut reader) => match frame {
                Ok(Some(body)) => body,
                Ok(None) => break,
                Err(e) => {
                    warn!(%peer, error = %e, "Reply socket read failed");
                    break;
                }
            }
        };

        let (reply, answer) = oneshot::channel();
        if requests.send(InboundRequest { peer, body, reply }).await.is_err() {
            break;
        }
        let answer = tokio::select! {
            _ = signal.wait() => break,
            answer = answer => match answer {
                Ok(answer) => answer,
                Err(_) => break,
            }
        };
        if let Err(e) = write_frame(&mut writer, &answer).await {
            warn!(%peer, error = %e, "Reply socket write failed");
            break;
        }
    }
    debug!(%peer, "Reply socket peer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn serve_uppercase(mut socket: ReplySocket, count: usize) {
        for _ in 0..count {
            let body = socket.recv().await.unwrap();
            socket.send(body.to_ascii_uppercase()).unwrap();
        }
    }

    #[tokio::test]
    async fn test_replies_reach_the_right_peer() {
        let ctx = TransportContext::new();
        let socket = ctx.reply_socket("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().to_string();
        tokio::spawn(serve_uppercase(socket, 4));

        let mut a = ctx.request_socket(&addr).await.unwrap();
        let mut b = ctx.request_socket(&addr).await.unwrap();

        a.send(b"alpha").await.unwrap();
        b.send(b"beta").await.unwrap();
        assert_eq!(b.recv().await.unwrap(), b"BETA".to_vec());
        assert_eq!(a.recv().await.unwrap(), b"ALPHA".to_vec());

        a.send(b"again").await.unwrap();
        assert_eq!(a.recv().await.unwrap(), b"AGAIN".to_vec());
    }

    #[tokio::test]
    async fn test_recv_twice_without_reply_fails() {
        let ctx = TransportContext::new();
        let mut socket = ctx.reply_socket("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().to_string();

        let mut client = ctx.request_socket(&addr).await.unwrap();
        client.send(b"one").await.unwrap();

        let body = tokio::time::timeout(Duration::from_secs(2), socket.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body, b"one".to_vec());
        assert_eq!(socket.recv().await, Err(TransportError::ReplyPending));
        assert_eq!(socket.send(vec![]), Ok(()));
        assert_eq!(socket.send(vec![]), Err(TransportError::NoPendingRequest));
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let ctx = TransportContext::new();
        let first = ctx.reply_socket("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().to_string();
        assert!(matches!(
            ctx.reply_socket(&addr).await,
            Err(TransportError::Bind { .. })
        ));
    }
}
