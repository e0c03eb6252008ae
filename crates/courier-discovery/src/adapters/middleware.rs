//! Discovery middleware: one reply socket plus the context shutdown signal.

use async_trait::async_trait;
use courier_reactor::transport::ShutdownSignal;
use courier_reactor::{LoopHandle, Middleware, ReplySocket, TransportContext, TransportError};
use courier_types::{DiscoveryRequest, DiscoveryResponse};
use std::net::SocketAddr;

/// What the discovery loop can wake up for.
#[derive(Debug)]
pub enum DiscoveryIncoming {
    /// A decoded control-plane request.
    Request(DiscoveryRequest),
    /// The transport context is shutting down.
    Shutdown,
}

/// Reply-socket middleware of the discovery service.
#[derive(Debug)]
pub struct DiscoveryMiddleware {
    socket: ReplySocket,
    shutdown: ShutdownSignal,
    handle: LoopHandle,
}

impl DiscoveryMiddleware {
    /// Bind the reply socket on `addr`.
    pub async fn bind(
        ctx: &TransportContext,
        addr: &str,
        handle: LoopHandle,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            socket: ctx.reply_socket(addr).await?,
            shutdown: ctx.signal(),
            handle,
        })
    }

    /// Address actually bound.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.socket.local_addr()
    }

    /// Answer the request most recently delivered.
    pub fn reply(&mut self, response: &DiscoveryResponse) -> Result<(), TransportError> {
        self.socket.send(response.encode()?)
    }

    /// Stop the event loop after the current iteration.
    pub fn disable_event_loop(&self) {
        self.handle.disable();
    }
}

#[async_trait]
impl Middleware for DiscoveryMiddleware {
    type Incoming = DiscoveryIncoming;

    async fn next_incoming(&mut self) -> Result<DiscoveryIncoming, TransportError> {
        tokio::select! {
            biased;
            _ = self.shutdown.wait() => Ok(DiscoveryIncoming::Shutdown),
            body = self.socket.recv() => {
                // an unknown message type or role tag is fatal
                let request = DiscoveryRequest::decode(&body?)?;
                Ok(DiscoveryIncoming::Request(request))
            }
        }
    }
}
