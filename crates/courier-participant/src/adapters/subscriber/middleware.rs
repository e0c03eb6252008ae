//! Subscriber middleware: discovery replies and data share one wait.

use async_trait::async_trait;
use courier_reactor::{
    DiscoveryClient, LoopHandle, Middleware, SubscribeSocket, TransportContext, TransportError,
};
use courier_types::{DiscoveryResponse, Endpoint};
use tracing::info;

/// What the subscriber loop can wake up for.
#[derive(Debug)]
pub enum SubscriberIncoming {
    /// Reply to the outstanding discovery request.
    Reply(DiscoveryResponse),
    /// One data-plane message, undecoded.
    Publication(String),
}

/// Sockets owned by a subscriber.
#[derive(Debug)]
pub struct SubscriberMiddleware {
    discovery: DiscoveryClient,
    inbound: SubscribeSocket,
    handle: LoopHandle,
}

impl SubscriberMiddleware {
    /// Connect to discovery at `discovery` (`host:port`).
    pub async fn configure(
        ctx: &TransportContext,
        discovery: &str,
        handle: LoopHandle,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            discovery: DiscoveryClient::connect(ctx, discovery).await?,
            inbound: ctx.subscribe_socket(),
            handle,
        })
    }

    /// Control-plane client.
    pub fn discovery(&mut self) -> &mut DiscoveryClient {
        &mut self.discovery
    }

    /// Subscribe to `topics` and connect to `publisher`.
    pub async fn make_subscription(
        &mut self,
        publisher: &Endpoint,
        topics: &[String],
    ) -> Result<(), TransportError> {
        for topic in topics {
            self.inbound.subscribe(topic).await?;
        }
        info!(publisher = %publisher.id, endpoint = %publisher, "Subscribing");
        self.inbound.connect(&publisher.socket_addr()).await
    }

    /// Stop the event loop after the current iteration.
    pub fn disable_event_loop(&self) {
        self.handle.disable();
    }
}

#[async_trait]
impl Middleware for SubscriberMiddleware {
    type Incoming = SubscriberIncoming;

    async fn next_incoming(&mut self) -> Result<SubscriberIncoming, TransportError> {
        tokio::select! {
            reply = self.discovery.next_reply() => Ok(SubscriberIncoming::Reply(reply?)),
            text = self.inbound.recv() => Ok(SubscriberIncoming::Publication(text?)),
        }
    }
}
