//! Broker middleware.
//!
//! Only the discovery socket is polled by the event loop; the inbound data
//! socket is read by the application one message per tick.

use async_trait::async_trait;
use courier_reactor::{
    DiscoveryClient, LoopHandle, Middleware, PublishSocket, SubscribeSocket, TransportContext,
    TransportError,
};
use courier_types::{DiscoveryResponse, Endpoint};
use std::net::SocketAddr;
use tracing::{debug, info};

/// Sockets owned by the broker.
#[derive(Debug)]
pub struct BrokerMiddleware {
    discovery: DiscoveryClient,
    inbound: SubscribeSocket,
    outbound: PublishSocket,
    handle: LoopHandle,
}

impl BrokerMiddleware {
    /// Connect to discovery and bind the outbound socket once.
    ///
    /// # Arguments
    ///
    /// * `discovery` - Discovery service `host:port`
    /// * `bind` - Local `host:port` for the outbound fan-out socket
    /// * `handle` - Loop sentinel for [`Self::disable_event_loop`]
    pub async fn configure(
        ctx: &TransportContext,
        discovery: &str,
        bind: &str,
        handle: LoopHandle,
    ) -> Result<Self, TransportError> {
        let discovery = DiscoveryClient::connect(ctx, discovery).await?;
        let outbound = ctx.publish_socket(bind).await?;
        let mut inbound = ctx.subscribe_socket();
        // relay everything
        inbound.subscribe("").await?;
        Ok(Self {
            discovery,
            inbound,
            outbound,
            handle,
        })
    }

    /// Control-plane client.
    pub fn discovery(&mut self) -> &mut DiscoveryClient {
        &mut self.discovery
    }

    /// Address the outbound socket is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.outbound.local_addr()
    }

    /// Connect the inbound socket to every publisher in `roster` except
    /// `own_id`. Returns how many connections were opened.
    pub async fn connect_to_publishers(
        &mut self,
        roster: &[Endpoint],
        own_id: &str,
    ) -> Result<usize, TransportError> {
        let mut connected = 0;
        for publisher in roster.iter().filter(|p| p.id != own_id) {
            info!(publisher = %publisher.id, endpoint = %publisher, "Connecting to publisher");
            self.inbound.connect(&publisher.socket_addr()).await?;
            connected += 1;
        }
        Ok(connected)
    }

    /// Block for the next data-plane message from any publisher.
    pub async fn receive_publication(&mut self) -> Result<String, TransportError> {
        self.inbound.recv().await
    }

    /// Publish one relayed message to every subscriber.
    pub fn relay(&self, message: &str) -> usize {
        let peers = self.outbound.send(message);
        debug!(peers, message, "Relayed");
        peers
    }

    /// Stop the event loop after the current iteration.
    pub fn disable_event_loop(&self) {
        self.handle.disable();
    }
}

#[async_trait]
impl Middleware for BrokerMiddleware {
    type Incoming = DiscoveryResponse;

    async fn next_incoming(&mut self) -> Result<DiscoveryResponse, TransportError> {
        self.discovery.next_reply().await
    }
}
