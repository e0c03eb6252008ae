//! # Subscriber Application
//!
//! Completes after `iters` messages, the same batch policy the broker uses.
//! Under broker dissemination the topic lookup answers with the broker's
//! endpoint, so the same code path subscribes to the broker.
//!
//! Two early exits keep a subscriber from waiting on a quota it cannot
//! reach: an empty lookup completes at once, and once messages have started
//! flowing, a silence longer than `idle_timeout` completes with what arrived.

use async_trait::async_trait;
use courier_reactor::{EventLoop, LoopStats, Reactor, Timeout, TransportError};
use courier_types::{DiscoveryResponse, MessageType, Publication, Role, WallClock};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::middleware::{SubscriberIncoming, SubscriberMiddleware};
use crate::adapters::ParticipantConfig;
use crate::domain::{LatencyRecord, SubscriberEvent, SubscriberState, TransitionError};
use crate::ports::LatencySink;

/// Terminal failures of a subscriber process.
#[derive(Debug, Error)]
pub enum SubscriberError {
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
        state: SubscriberState,
        received: MessageType,
    },

    /// The latency sink failed.
    #[error("Latency sink failed: {0}")]
    Sink(String),
}

/// Application object of a subscriber.
pub struct SubscriberApp {
    config: ParticipantConfig,
    state: SubscriberState,
    records: Vec<LatencyRecord>,
    sink: Option<Box<dyn LatencySink>>,
    publishers: usize,
}

impl std::fmt::Debug for SubscriberApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberApp")
            .field("name", &self.config.name)
            .field("state", &self.state)
            .field("received", &self.records.len())
            .finish()
    }
}

impl SubscriberApp {
    /// Apply `config`; the app ends in `Configure`.
    pub fn configure(config: ParticipantConfig) -> Result<Self, SubscriberError> {
        let mut app = Self {
            config,
            state: SubscriberState::Initialize,
            records: Vec::new(),
            sink: None,
            publishers: 0,
        };
        app.advance(SubscriberEvent::Configured)?;
        info!(
            name = %app.config.name,
            lookup = %app.config.lookup,
            dissemination = %app.config.dissemination,
            num_topics = app.config.topics.len(),
            topics = ?app.config.topics,
            iterations = app.config.iters,
            frequency = app.config.frequency,
            idle_timeout = ?app.config.idle_timeout,
            "Subscriber configured"
        );
        Ok(app)
    }

    /// Also hand every record to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn LatencySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn advance(&mut self, event: SubscriberEvent) -> Result<(), TransitionError> {
        let next = self.state.on(event)?;
        if next != self.state {
            info!(from = ?self.state, to = ?next, ?event, "Subscriber state change");
        }
        self.state = next;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SubscriberState {
        self.state
    }

    /// Records of every message received so far.
    #[must_use]
    pub fn records(&self) -> &[LatencyRecord] {
        &self.records
    }

    /// Endpoints subscribed to.
    #[must_use]
    pub fn publishers(&self) -> usize {
        self.publishers
    }

    /// Run the subscriber lifecycle to completion.
    pub async fn driver(
        &mut self,
        event_loop: &EventLoop,
        middleware: &mut SubscriberMiddleware,
    ) -> Result<LoopStats, SubscriberError> {
        self.advance(SubscriberEvent::Started)?;
        let stats = event_loop.run(self, middleware, Timeout::Immediate).await?;
        info!(name = %self.config.name, received = self.records.len(), "Subscriber completed");
        Ok(stats)
    }

    fn quota_reached(&self) -> bool {
        self.records.len() >= self.config.iters
    }

    /// Wait for the next message, bounded by the idle window if one is set.
    fn receive_timeout(&self) -> Timeout {
        self.config
            .idle_timeout
            .map_or(Timeout::Indefinite, Timeout::After)
    }

    fn on_publication(&mut self, text: &str) -> Result<(), SubscriberError> {
        let received_at = WallClock::now();
        let publication = match Publication::parse(text) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Dropping malformed publication");
                return Ok(());
            }
        };
        let record = LatencyRecord::new(
            &publication,
            &self.config.name,
            self.config.topics.len(),
            received_at,
        );
        debug!(
            topic = %record.topic,
            publisher = %record.pub_id,
            latency_ms = record.latency_ms,
            from_broker = record.from_broker,
            "Received"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&record)
                .map_err(|e| SubscriberError::Sink(e.to_string()))?;
        }
        self.records.push(record);
        Ok(())
    }
}

#[async_trait]
impl Reactor for SubscriberApp {
    type Middleware = SubscriberMiddleware;
    type Error = SubscriberError;

    async fn handle_incoming(
        &mut self,
        middleware: &mut SubscriberMiddleware,
        incoming: SubscriberIncoming,
    ) -> Result<Timeout, SubscriberError> {
        let response = match incoming {
            SubscriberIncoming::Publication(text) => {
                if self.state != SubscriberState::Receive {
                    debug!(state = ?self.state, "Ignoring early publication");
                    return Ok(Timeout::Indefinite);
                }
                self.on_publication(&text)?;
                if self.quota_reached() {
                    self.advance(SubscriberEvent::QuotaReached)?;
                    return Ok(Timeout::Immediate);
                }
                return Ok(self.receive_timeout());
            }
            SubscriberIncoming::Reply(response) => response,
        };

        match (self.state, response) {
            (SubscriberState::Register, DiscoveryResponse::Register(reply)) => {
                if !reply.is_success() {
                    return Err(SubscriberError::RegistrationRejected {
                        reason: reply.reason,
                    });
                }
                info!(reason = %reply.reason, "Subscriber registered");
                self.advance(SubscriberEvent::Registered)?;
                Ok(Timeout::Immediate)
            }
            (SubscriberState::IsReady, DiscoveryResponse::IsReady { status: false }) => {
                warn!(backoff = ?self.config.ready_backoff, "Not ready yet; checking again");
                self.advance(SubscriberEvent::NotReady)?;
                Ok(Timeout::After(self.config.ready_backoff))
            }
            (SubscriberState::IsReady, DiscoveryResponse::IsReady { status: true }) => {
                self.advance(SubscriberEvent::Ready)?;
                Ok(Timeout::Immediate)
            }
            (
                SubscriberState::CheckMsg,
                DiscoveryResponse::LookupPublishersByTopic { publishers },
            ) => {
                if publishers.is_empty() {
                    warn!(topics = ?self.config.topics, "No publisher carries our topics");
                    self.advance(SubscriberEvent::NoSources)?;
                    return Ok(Timeout::Immediate);
                }
                for publisher in &publishers {
                    middleware
                        .make_subscription(publisher, &self.config.topics)
                        .await?;
                }
                self.publishers = publishers.len();
                info!(publishers = self.publishers, "Subscribed to topic sources");
                self.advance(SubscriberEvent::Subscribed)?;
                Ok(Timeout::Immediate)
            }
            (state, other) => Err(SubscriberError::UnexpectedReply {
                state,
                received: other.message_type(),
            }),
        }
    }

    async fn invoke_operation(
        &mut self,
        middleware: &mut SubscriberMiddleware,
    ) -> Result<Timeout, SubscriberError> {
        match self.state {
            SubscriberState::Register => {
                let me = self.config.advertised(self.config.port);
                middleware
                    .discovery()
                    .register(Role::Subscriber, me, self.config.topics.clone())
                    .await?;
                Ok(Timeout::Indefinite)
            }
            SubscriberState::IsReady => {
                middleware.discovery().is_ready().await?;
                Ok(Timeout::Indefinite)
            }
            SubscriberState::CheckMsg => {
                middleware
                    .discovery()
                    .lookup_publishers_by_topic(self.config.topics.clone())
                    .await?;
                Ok(Timeout::Indefinite)
            }
            SubscriberState::Receive => {
                if self.quota_reached() {
                    self.advance(SubscriberEvent::QuotaReached)?;
                    return Ok(Timeout::Immediate);
                }
                if !self.records.is_empty() && self.config.idle_timeout.is_some() {
                    // woken by the idle timer, not by a message
                    info!(
                        received = self.records.len(),
                        expected = self.config.iters,
                        idle = ?self.config.idle_timeout,
                        "Sources went quiet before the quota"
                    );
                    self.advance(SubscriberEvent::SourcesIdle)?;
                    return Ok(Timeout::Immediate);
                }
                Ok(Timeout::Indefinite)
            }
            SubscriberState::Completed => {
                middleware.disable_event_loop();
                Ok(Timeout::Immediate)
            }
            SubscriberState::Initialize | SubscriberState::Configure => {
                Err(TransitionError::Subscriber {
                    state: self.state,
                    event: SubscriberEvent::Started,
                }
                .into())
            }
        }
    }
}
