//! # Discovery Client
//!
//! Typed control-plane helpers over a [`RequestSocket`].
//!
//! The helpers only send. The reply arrives later through
//! [`DiscoveryClient::next_reply`], which a middleware can poll next to its
//! data sockets; [`DiscoveryClient::request`] does both in one call.

use courier_types::{
    DiscoveryRequest, DiscoveryResponse, Endpoint, MessageType, ProtocolError, RegisterRequest,
    Role,
};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{RequestSocket, TransportContext};

/// Request socket to the discovery service, aware of the outstanding
/// message type.
#[derive(Debug)]
pub struct DiscoveryClient {
    socket: RequestSocket,
    outstanding: Option<MessageType>,
}

impl DiscoveryClient {
    /// Connect to the discovery service at `addr` (`host:port`).
    pub async fn connect(ctx: &TransportContext, addr: &str) -> Result<Self, TransportError> {
        Ok(Self {
            socket: ctx.request_socket(addr).await?,
            outstanding: None,
        })
    }

    /// Message type awaiting its reply, if any.
    #[must_use]
    pub fn outstanding(&self) -> Option<MessageType> {
        self.outstanding
    }

    /// Send any request.
    pub async fn send(&mut self, request: &DiscoveryRequest) -> Result<(), TransportError> {
        let body = request.encode()?;
        self.socket.send(&body).await?;
        self.outstanding = Some(request.message_type());
        debug!(message = ?request.message_type(), "Discovery request sent");
        Ok(())
    }

    /// Send a registration.
    pub async fn register(
        &mut self,
        role: Role,
        info: Endpoint,
        topics: Vec<String>,
    ) -> Result<(), TransportError> {
        self.send(&DiscoveryRequest::Register(RegisterRequest { role, info, topics }))
            .await
    }

    /// Ask for readiness.
    pub async fn is_ready(&mut self) -> Result<(), TransportError> {
        self.send(&DiscoveryRequest::IsReady).await
    }

    /// Ask for the full publisher roster.
    pub async fn lookup_all_publishers(&mut self) -> Result<(), TransportError> {
        self.send(&DiscoveryRequest::LookupAllPublishers).await
    }

    /// Ask for publishers carrying any of `topics`.
    pub async fn lookup_publishers_by_topic(
        &mut self,
        topics: Vec<String>,
    ) -> Result<(), TransportError> {
        self.send(&DiscoveryRequest::LookupPublishersByTopic { topics })
            .await
    }

    /// Wait for the reply to the outstanding request. Cancel-safe; parks
    /// while nothing is outstanding.
    ///
    /// A reply whose type does not answer the request is a protocol error.
    pub async fn next_reply(&mut self) -> Result<DiscoveryResponse, TransportError> {
        let body = self.socket.poll_reply().await?;
        let expected = self.outstanding.take();
        let response = DiscoveryResponse::decode(&body)?;
        if let Some(expected) = expected {
            let received = response.message_type();
            if received != expected {
                return Err(ProtocolError::UnexpectedReply { expected, received }.into());
            }
        }
        Ok(response)
    }
}
