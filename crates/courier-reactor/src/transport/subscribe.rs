//! # Subscribe Socket
//!
//! One socket, many connects: every connected publisher feeds the same
//! inbound queue. Subscription prefixes apply to current and future
//! connections alike.

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::frame::{read_frame, write_frame, SubscriptionCommand};
use super::{ShutdownSignal, TransportContext};
use crate::error::TransportError;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Fan-in subscriber socket.
#[derive(Debug)]
pub struct SubscribeSocket {
    signal: ShutdownSignal,
    filters: Vec<String>,
    upstreams: Vec<OwnedWriteHalf>,
    inbound_tx: mpsc::Sender<String>,
    inbound: mpsc::Receiver<String>,
}

impl SubscribeSocket {
    /// Create an unconnected socket with no subscriptions.
    #[must_use]
    pub fn new(ctx: &TransportContext) -> Self {
        let (inbound_tx, inbound) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            signal: ctx.signal(),
            filters: Vec::new(),
            upstreams: Vec::new(),
            inbound_tx,
            inbound,
        }
    }

    /// Connect to one more publisher at `addr` (`host:port`).
    pub async fn connect(&mut self, addr: &str) -> Result<(), TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::Connect {
                addr: addr.to_string(),
                error: e.to_string(),
            })?;
        stream.set_nodelay(true)?;
        let (mut reader, mut writer) = stream.into_split();

        for prefix in &self.filters {
            write_frame(&mut writer, &SubscriptionCommand::Subscribe(prefix.clone()).encode())
                .await?;
        }

        let tx = self.inbound_tx.clone();
        let mut signal = self.signal.clone();
        let peer = addr.to_string();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = signal.wait() => break,
                    frame = read_frame(&mut reader) => match frame {
                        Ok(Some(body)) => match String::from_utf8(body) {
                            Ok(text) => {
                                if tx.send(text).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => warn!(%peer, "Dropping non-UTF-8 message"),
                        },
                        Ok(None) => break,
                        Err(e) => {
                            warn!(%peer, error = %e, "Subscriber read failed");
                            break;
                        }
                    }
                }
            }
            debug!(%peer, "Publisher connection closed");
        });

        debug!(peer = %addr, "Subscribe socket connected");
        self.upstreams.push(writer);
        Ok(())
    }

    /// Receive messages starting with `prefix` (`""` means everything).
    pub async fn subscribe(&mut self, prefix: &str) -> Result<(), TransportError> {
        if self.filters.iter().any(|f| f == prefix) {
            return Ok(());
        }
        self.filters.push(prefix.to_string());
        self.broadcast(SubscriptionCommand::Subscribe(prefix.to_string()))
            .await
    }

    async fn broadcast(&mut self, command: SubscriptionCommand) -> Result<(), TransportError> {
        let frame = command.encode();
        for writer in &mut self.upstreams {
            write_frame(writer, &frame).await?;
        }
        Ok(())
    }

    /// Active subscription prefixes.
    #[must_use]
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Next message from any connected publisher. Cancel-safe.
    ///
    /// Never resolves while nothing is connected.
    pub async fn recv(&mut self) -> Result<String, TransportError> {
        self.inbound.recv().await.ok_or(TransportError::Closed)
    }
}
