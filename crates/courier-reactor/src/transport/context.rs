//! # Transport Context
//!
//! The one resource every socket is created from. Dropping the context (or
//! calling [`TransportContext::shutdown`]) stops every background task it
//! spawned; sockets that outlive it report [`TransportError::Closed`].

use tokio::sync::watch;
use tracing::debug;

use super::{PublishSocket, ReplySocket, RequestSocket, SubscribeSocket};
use crate::error::TransportError;

/// Explicitly owned socket factory with scoped shutdown.
#[derive(Debug)]
pub struct TransportContext {
    shutdown: watch::Sender<bool>,
}

impl TransportContext {
    /// Create a live context.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self { shutdown }
    }

    /// Stop every background task spawned through this context.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            debug!("Transport context shut down");
        }
    }

    /// Signal handed to background tasks.
    #[must_use]
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.shutdown.subscribe(),
        }
    }

    /// Connect a request socket to `addr` (`host:port`).
    pub async fn request_socket(&self, addr: &str) -> Result<RequestSocket, TransportError> {
        RequestSocket::connect(self, addr).await
    }

    /// Bind a reply socket on `addr`.
    pub async fn reply_socket(&self, addr: &str) -> Result<ReplySocket, TransportError> {
        ReplySocket::bind(self, addr).await
    }

    /// Bind a publish socket on `addr`.
    pub async fn publish_socket(&self, addr: &str) -> Result<PublishSocket, TransportError> {
        PublishSocket::bind(self, addr).await
    }

    /// Create an unconnected subscribe socket.
    #[must_use]
    pub fn subscribe_socket(&self) -> SubscribeSocket {
        SubscribeSocket::new(self)
    }
}

impl Default for TransportContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransportContext {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

/// Receiver side of the context's shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once the context shuts down or is dropped.
    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
