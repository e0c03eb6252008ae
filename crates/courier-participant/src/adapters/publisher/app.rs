//! # Publisher Application
//!
//! Publishes `iters` rounds at `frequency` rounds per second; each round
//! sends one stamped message per topic.

use async_trait::async_trait;
use courier_reactor::{EventLoop, LoopStats, Reactor, Timeout, TransportError};
use courier_types::{DiscoveryResponse, MessageType, Publication, Role};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::middleware::PublisherMiddleware;
use crate::adapters::ParticipantConfig;
use crate::domain::{PublisherEvent, PublisherState, TopicSelector, TransitionError};

/// Terminal failures of a publisher process.
#[derive(Debug, Error)]
pub enum PublisherError {
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
        state: PublisherState,
        received: MessageType,
    },
}

/// Application object of a publisher.
#[derive(Debug)]
pub struct PublisherApp {
    config: ParticipantConfig,
    state: PublisherState,
    selector: TopicSelector,
    rounds: usize,
    sent: u64,
}

impl PublisherApp {
    /// Apply `config`; the app ends in `Configure`.
    pub fn configure(config: ParticipantConfig) -> Result<Self, PublisherError> {
        let mut app = Self {
            config,
            state: PublisherState::Initialize,
            selector: TopicSelector::new(),
            rounds: 0,
            sent: 0,
        };
        app.advance(PublisherEvent::Configured)?;
        info!(
            name = %app.config.name,
            lookup = %app.config.lookup,
            dissemination = %app.config.dissemination,
            num_topics = app.config.topics.len(),
            topics = ?app.config.topics,
            iterations = app.config.iters,
            frequency = app.config.frequency,
            "Publisher configured"
        );
        Ok(app)
    }

    fn advance(&mut self, event: PublisherEvent) -> Result<(), TransitionError> {
        let next = self.state.on(event)?;
        if next != self.state {
            info!(from = ?self.state, to = ?next, ?event, "Publisher state change");
        }
        self.state = next;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PublisherState {
        self.state
    }

    /// Rounds published so far.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Messages handed to the data socket so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Run the publisher lifecycle to completion.
    pub async fn driver(
        &mut self,
        event_loop: &EventLoop,
        middleware: &mut PublisherMiddleware,
    ) -> Result<LoopStats, PublisherError> {
        self.advance(PublisherEvent::Started)?;
        let stats = event_loop.run(self, middleware, Timeout::Immediate).await?;
        info!(name = %self.config.name, rounds = self.rounds, sent = self.sent, "Publisher completed");
        Ok(stats)
    }

    /// One stamped message per topic.
    fn round(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.config
            .topics
            .iter()
            .map(|topic| {
                let payload = self.selector.sample_payload(&mut rng, topic);
                Publication::new(topic.clone(), self.config.name.clone(), payload).to_string()
            })
            .collect()
    }
}

#[async_trait]
impl Reactor for PublisherApp {
    type Middleware = PublisherMiddleware;
    type Error = PublisherError;

    async fn handle_incoming(
        &mut self,
        _middleware: &mut PublisherMiddleware,
        response: DiscoveryResponse,
    ) -> Result<Timeout, PublisherError> {
        match (self.state, response) {
            (PublisherState::Register, DiscoveryResponse::Register(reply)) => {
                if !reply.is_success() {
                    return Err(PublisherError::RegistrationRejected {
                        reason: reply.reason,
                    });
                }
                info!(reason = %reply.reason, "Publisher registered");
                self.advance(PublisherEvent::Registered)?;
                Ok(Timeout::Immediate)
            }
            (PublisherState::IsReady, DiscoveryResponse::IsReady { status: false }) => {
                warn!(backoff = ?self.config.ready_backoff, "Not ready yet; checking again");
                self.advance(PublisherEvent::NotReady)?;
                Ok(Timeout::After(self.config.ready_backoff))
            }
            (PublisherState::IsReady, DiscoveryResponse::IsReady { status: true }) => {
                self.advance(PublisherEvent::Ready)?;
                Ok(Timeout::Immediate)
            }
            (state, other) => Err(PublisherError::UnexpectedReply {
                state,
                received: other.message_type(),
            }),
        }
    }

    async fn invoke_operation(
        &mut self,
        middleware: &mut PublisherMiddleware,
    ) -> Result<Timeout, PublisherError> {
        match self.state {
            PublisherState::Register => {
                let me = self.config.advertised(middleware.local_addr().port());
                info!(endpoint = %me, "Registering with discovery");
                middleware
                    .discovery()
                    .register(Role::Publisher, me, self.config.topics.clone())
                    .await?;
                Ok(Timeout::Indefinite)
            }
            PublisherState::IsReady => {
                middleware.discovery().is_ready().await?;
                Ok(Timeout::Indefinite)
            }
            PublisherState::Disseminate => {
                if self.rounds >= self.config.iters {
                    self.advance(PublisherEvent::RoundsExhausted)?;
                    return Ok(Timeout::Immediate);
                }
                for message in self.round() {
                    let peers = middleware.publish(&message);
                    debug!(%message, peers, "Published");
                    self.sent += 1;
                }
                self.rounds += 1;
                Ok(Timeout::pacing(self.config.frequency))
            }
            PublisherState::Completed => {
                middleware.disable_event_loop();
                Ok(Timeout::Immediate)
            }
            PublisherState::Initialize | PublisherState::Configure => {
                Err(TransitionError::Publisher {
                    state: self.state,
                    event: PublisherEvent::Started,
                }
                .into())
            }
        }
    }
}
