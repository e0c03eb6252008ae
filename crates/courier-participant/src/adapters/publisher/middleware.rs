//! Publisher middleware: a discovery client and one bound fan-out socket.

use async_trait::async_trait;
use courier_reactor::{
    DiscoveryClient, LoopHandle, Middleware, PublishSocket, TransportContext, TransportError,
};
use courier_types::DiscoveryResponse;
use std::net::SocketAddr;

/// Sockets owned by a publisher.
#[derive(Debug)]
pub struct PublisherMiddleware {
    discovery: DiscoveryClient,
    outbound: PublishSocket,
    handle: LoopHandle,
}

impl PublisherMiddleware {
    /// Connect to discovery and bind the data socket on `bind`.
    pub async fn configure(
        ctx: &TransportContext,
        discovery: &str,
        bind: &str,
        handle: LoopHandle,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            discovery: DiscoveryClient::connect(ctx, discovery).await?,
            outbound: ctx.publish_socket(bind).await?,
            handle,
        })
    }

    /// Control-plane client.
    pub fn discovery(&mut self) -> &mut DiscoveryClient {
        &mut self.discovery
    }

    /// Address the data socket is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.outbound.local_addr()
    }

    /// Publish one encoded message.
    pub fn publish(&self, text: &str) -> usize {
        self.outbound.send(text)
    }

    /// Stop the event loop after the current iteration.
    pub fn disable_event_loop(&self) {
        self.handle.disable();
    }
}

#[async_trait]
impl Middleware for PublisherMiddleware {
    type Incoming = DiscoveryResponse;

    async fn next_incoming(&mut self) -> Result<DiscoveryResponse, TransportError> {
        self.discovery.next_reply().await
    }
}
