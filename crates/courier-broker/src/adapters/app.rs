//! # Broker Application
//!
//! Batch policy: the broker buffers `iters` messages, then drains the batch
//! one message per pacing tick and completes. `iters = 0` disseminates an
//! empty batch straight away.

use async_trait::async_trait;
use courier_reactor::{EventLoop, LoopStats, Reactor, Timeout, TransportError};
use courier_types::{DiscoveryResponse, DisseminationMode, Endpoint, MessageType, Role, TOPIC_CATALOGUE};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::middleware::BrokerMiddleware;
use crate::domain::{BrokerEvent, BrokerState, RelayBuffer, TransitionError};

/// Pause between readiness polls unless configured otherwise.
pub const DEFAULT_READY_BACKOFF: Duration = Duration::from_secs(10);

/// Terminal failures of the broker process.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Discovery refused our registration.
    #[error("Registration rejected: {reason}")]
    RegistrationRejected { reason: String },

    /// A reply arrived in a state that does not expect it.
    #[error("Unexpected {received:?} reply in state {state:?}")]
    UnexpectedReply {
        state: BrokerState,
        received: MessageType,
    },
}

/// Startup parameters.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Our name, unique among brokers.
    pub name: String,
    /// Host advertised to discovery.
    pub addr: String,
    /// Port advertised to discovery; 0 advertises the port actually bound.
    pub port: u16,
    /// Lookup strategy name from the config file.
    pub lookup: String,
    /// Dissemination mode from the config file.
    pub dissemination: DisseminationMode,
    /// Messages per batch.
    pub iters: usize,
    /// Relay rate in messages per second.
    pub frequency: u32,
    /// Pause between readiness polls.
    pub ready_backoff: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            name: "broker".to_string(),
            addr: "localhost".to_string(),
            port: 5578,
            lookup: "Centralized".to_string(),
            dissemination: DisseminationMode::Broker,
            iters: 1000,
            frequency: 1,
            ready_backoff: DEFAULT_READY_BACKOFF,
        }
    }
}

/// Application object of the broker.
#[derive(Debug)]
pub struct BrokerApp {
    config: BrokerConfig,
    topics: Vec<String>,
    state: BrokerState,
    buffer: RelayBuffer,
    relayed: u64,
}

impl BrokerApp {
    /// Apply `config`; the app ends in `Configure`.
    pub fn configure(config: BrokerConfig) -> Result<Self, BrokerError> {
        let mut app = Self {
            topics: TOPIC_CATALOGUE.iter().map(|t| t.to_string()).collect(),
            config,
            state: BrokerState::Initialize,
            buffer: RelayBuffer::new(),
            relayed: 0,
        };
        app.advance(BrokerEvent::Configured)?;
        app.dump();
        Ok(app)
    }

    fn dump(&self) {
        info!(
            name = %self.config.name,
            lookup = %self.config.lookup,
            dissemination = %self.config.dissemination,
            num_topics = self.topics.len(),
            topics = ?self.topics,
            iterations = self.config.iters,
            frequency = self.config.frequency,
            "Broker configured"
        );
    }

    fn advance(&mut self, event: BrokerEvent) -> Result<(), TransitionError> {
        let next = self.state.on(event)?;
        if next != self.state {
            info!(from = ?self.state, to = ?next, ?event, "Broker state change");
        }
        self.state = next;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BrokerState {
        self.state
    }

    /// Messages relayed so far.
    #[must_use]
    pub fn relayed(&self) -> u64 {
        self.relayed
    }

    /// Messages currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn pacing(&self) -> Timeout {
        Timeout::pacing(self.config.frequency)
    }

    /// Run the broker lifecycle to completion.
    pub async fn driver(
        &mut self,
        event_loop: &EventLoop,
        middleware: &mut BrokerMiddleware,
    ) -> Result<LoopStats, BrokerError> {
        self.advance(BrokerEvent::Started)?;
        let stats = event_loop.run(self, middleware, Timeout::Immediate).await?;
        info!(name = %self.config.name, relayed = self.relayed, "Broker completed");
        Ok(stats)
    }

    fn advertised(&self, middleware: &BrokerMiddleware) -> Endpoint {
        let port = match self.config.port {
            0 => middleware.local_addr().port(),
            port => port,
        };
        Endpoint::new(self.config.name.clone(), self.config.addr.clone(), port)
    }
}

#[async_trait]
impl Reactor for BrokerApp {
    type Middleware = BrokerMiddleware;
    type Error = BrokerError;

    async fn handle_incoming(
        &mut self,
        middleware: &mut BrokerMiddleware,
        response: DiscoveryResponse,
    ) -> Result<Timeout, BrokerError> {
        match (self.state, response) {
            (BrokerState::Register, DiscoveryResponse::Register(reply)) => {
                if !reply.is_success() {
                    return Err(BrokerError::RegistrationRejected {
                        reason: reply.reason,
                    });
                }
                info!(reason = %reply.reason, "Broker registered");
                self.advance(BrokerEvent::Registered)?;
                Ok(Timeout::Immediate)
            }
            (BrokerState::IsReady, DiscoveryResponse::IsReady { status: false }) => {
                warn!(backoff = ?self.config.ready_backoff, "Not ready yet; checking again");
                self.advance(BrokerEvent::NotReady)?;
                Ok(Timeout::After(self.config.ready_backoff))
            }
            (BrokerState::IsReady, DiscoveryResponse::IsReady { status: true }) => {
                self.advance(BrokerEvent::Ready)?;
                Ok(Timeout::Immediate)
            }
            (BrokerState::CheckMsg, DiscoveryResponse::LookupAllPublishers { publishers }) => {
                let connected = middleware
                    .connect_to_publishers(&publishers, &self.config.name)
                    .await?;
                info!(publishers = connected, "Connected to publisher roster");
                self.advance(BrokerEvent::RosterConnected)?;
                Ok(Timeout::Immediate)
            }
            (state, other) => Err(BrokerError::UnexpectedReply {
                state,
                received: other.message_type(),
            }),
        }
    }

    async fn invoke_operation(
        &mut self,
        middleware: &mut BrokerMiddleware,
    ) -> Result<Timeout, BrokerError> {
        match self.state {
            BrokerState::Register => {
                let me = self.advertised(middleware);
                info!(endpoint = %me, "Registering with discovery");
                middleware
                    .discovery()
                    .register(Role::Both, me, self.topics.clone())
                    .await?;
                Ok(Timeout::Indefinite)
            }
            BrokerState::IsReady => {
                middleware.discovery().is_ready().await?;
                Ok(Timeout::Indefinite)
            }
            BrokerState::CheckMsg => {
                middleware.discovery().lookup_all_publishers().await?;
                Ok(Timeout::Indefinite)
            }
            BrokerState::ReceiveFromPub => {
                if self.buffer.len() >= self.config.iters {
                    info!(batch = self.buffer.len(), "Batch full, disseminating");
                    self.advance(BrokerEvent::BatchFull)?;
                    return Ok(Timeout::Immediate);
                }
                let message = middleware.receive_publication().await?;
                debug!(%message, buffered = self.buffer.len() + 1, "Buffered");
                self.buffer.push(message);
                Ok(self.pacing())
            }
            BrokerState::Disseminate => match self.buffer.pop_relayed() {
                Some(message) => {
                    middleware.relay(&message);
                    self.relayed += 1;
                    Ok(self.pacing())
                }
                None => {
                    info!(relayed = self.relayed, "Dissemination completed");
                    self.advance(BrokerEvent::BufferDrained)?;
                    Ok(Timeout::Immediate)
                }
            },
            BrokerState::Completed => {
                middleware.disable_event_loop();
                Ok(Timeout::Immediate)
            }
            BrokerState::Initialize | BrokerState::Configure => Err(TransitionError {
                state: self.state,
                event: BrokerEvent::Started,
            }
            .into()),
        }
    }
}
