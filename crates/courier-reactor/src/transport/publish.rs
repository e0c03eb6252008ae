//! # Publish Socket
//!
//! Binds once and fans every text message out to every connected
//! subscriber whose subscription prefixes match it. A message with no
//! matching subscriber is dropped; a subscriber that falls more than
//! [`DEFAULT_CHANNEL_CAPACITY`] messages behind loses the oldest ones.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::frame::{read_frame, write_frame, SubscriptionCommand};
use super::{ShutdownSignal, TransportContext};
use crate::error::TransportError;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Bound fan-out socket.
#[derive(Debug)]
pub struct PublishSocket {
    local_addr: SocketAddr,
    sender: broadcast::Sender<Arc<str>>,
    peers: Arc<AtomicUsize>,
}

impl PublishSocket {
    /// Bind on `addr` and start accepting subscribers.
    pub async fn bind(ctx: &TransportContext, addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TransportError::Bind {
                addr: addr.to_string(),
                error: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        let peers = Arc::new(AtomicUsize::new(0));

        let mut signal = ctx.signal();
        let task_signal = ctx.signal();
        let task_sender = sender.clone();
        let task_peers = Arc::clone(&peers);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = signal.wait() => break,
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            debug!(%peer, "Subscriber connected");
                            task_peers.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(serve_subscriber(
                                stream,
                                peer,
                                task_sender.subscribe(),
                                Arc::clone(&task_peers),
                                task_signal.clone(),
                            ));
                        }
                        Err(e) => warn!(error = %e, "Publish socket accept failed"),
                    }
                }
            }
        });

        info!(addr = %local_addr, "Publish socket bound");
        Ok(Self {
            local_addr,
            sender,
            peers,
        })
    }

    /// Address actually bound (useful with port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of currently connected subscribers.
    #[must_use]
    pub fn connected_peers(&self) -> usize {
        self.peers.load(Ordering::SeqCst)
    }

    /// Queue `text` for every connected subscriber.
    ///
    /// Returns how many connections will see it before filtering.
    pub fn send(&self, text: &str) -> usize {
        // no connected subscriber: dropped
        self.sender.send(Arc::from(text)).unwrap_or(0)
    }
}

/// Writer loop for one subscriber, with a sub-task reading its filters.
async fn serve_subscriber(
    stream: TcpStream,
    peer: SocketAddr,
    mut messages: broadcast::Receiver<Arc<str>>,
    peers: Arc<AtomicUsize>,
    mut signal: ShutdownSignal,
) {
    let (mut reader, mut writer) = stream.into_split();
    let (commands_tx, mut commands) = mpsc::channel(16);

    let mut reader_signal = signal.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = reader_signal.wait() => break,
                frame = read_frame(&mut reader) => match frame {
                    Ok(Some(body)) => match SubscriptionCommand::decode(&body) {
                        Some(command) => {
                            if commands_tx.send(command).await.is_err() {
                                break;
                            }
                        }
                        None => warn!(%peer, "Ignoring malformed subscription command"),
                    },
                    Ok(None) | Err(_) => break,
                }
            }
        }
    });

    let mut filters: Vec<String> = Vec::new();
    loop {
        tokio::select! {
            _ = signal.wait() => break,
            command = commands.recv() => match command {
                Some(SubscriptionCommand::Subscribe(prefix)) => {
                    debug!(%peer, %prefix, "Subscribed");
                    filters.push(prefix);
                }
                Some(SubscriptionCommand::Unsubscribe(prefix)) => {
                    if let Some(i) = filters.iter().position(|f| *f == prefix) {
                        filters.remove(i);
                    }
                }
                // peer hung up
                None => break,
            },
            message = messages.recv() => match message {
                Ok(text) => {
                    if !filters.iter().any(|f| text.starts_with(f.as_str())) {
                        continue;
                    }
                    if let Err(e) = write_frame(&mut writer, text.as_bytes()).await {
                        debug!(%peer, error = %e, "Subscriber write failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(%peer, skipped, "Subscriber lagging, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    peers.fetch_sub(1, Ordering::SeqCst);
    debug!(%peer, "Subscriber disconnected");
}
