//! # Discovery Application
//!
//! Lifecycle: `Initialize → Configure → Register → Completed`.
//!
//! Once in `Register` the service is request-driven: every inbound request
//! is answered inline and the loop waits indefinitely for the next one.
//! `Completed` is reached when the transport context shuts down.

use async_trait::async_trait;
use courier_reactor::{EventLoop, LoopStats, Reactor, Timeout, TransportError};
use courier_types::DisseminationMode;
use thiserror::Error;
use tracing::{info, warn};

use super::middleware::{DiscoveryIncoming, DiscoveryMiddleware};
use crate::domain::ReadinessConfig;
use crate::ports::DiscoveryApi;
use crate::service::DiscoveryService;

/// Lifecycle states of the discovery application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Initialize,
    Configure,
    Register,
    Completed,
}

/// Terminal failures of the discovery process.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Upcall arrived in a state that cannot handle it.
    #[error("Undefined state {state:?} for {action}")]
    UndefinedState {
        state: DiscoveryState,
        action: &'static str,
    },
}

/// Startup parameters.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Our name, used in logs.
    pub name: String,
    /// Lookup strategy name from the config file.
    pub lookup: String,
    /// Dissemination mode from the config file.
    pub dissemination: DisseminationMode,
    /// Expected population.
    pub readiness: ReadinessConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            name: "discovery".to_string(),
            lookup: "Centralized".to_string(),
            dissemination: DisseminationMode::Direct,
            readiness: ReadinessConfig::default(),
        }
    }
}

/// Application object of the discovery service.
#[derive(Debug)]
pub struct DiscoveryApp {
    name: String,
    state: DiscoveryState,
    service: DiscoveryService,
}

impl DiscoveryApp {
    /// Apply `config`; the app ends in `Configure`.
    #[must_use]
    pub fn configure(config: DiscoveryConfig) -> Self {
        let mut app = Self {
            name: config.name.clone(),
            state: DiscoveryState::Initialize,
            service: DiscoveryService::new(config.readiness, config.dissemination),
        };
        app.state = DiscoveryState::Configure;
        info!(
            name = %config.name,
            lookup = %config.lookup,
            dissemination = %config.dissemination,
            expected_publishers = config.readiness.expected_publishers,
            expected_subscribers = config.readiness.expected_subscribers,
            "Discovery configured"
        );
        app
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// The service answering requests.
    #[must_use]
    pub fn service(&self) -> &DiscoveryService {
        &self.service
    }

    /// Serve requests until the transport shuts down.
    pub async fn driver(
        &mut self,
        event_loop: &EventLoop,
        middleware: &mut DiscoveryMiddleware,
    ) -> Result<LoopStats, DiscoveryError> {
        if self.state != DiscoveryState::Configure {
            return Err(DiscoveryError::UndefinedState {
                state: self.state,
                action: "driver",
            });
        }
        self.state = DiscoveryState::Register;
        info!(name = %self.name, addr = %middleware.local_addr(), "Discovery serving");
        let stats = event_loop
            .run(self, middleware, Timeout::Indefinite)
            .await?;
        info!(name = %self.name, registry = ?self.service.stats(), "Discovery completed");
        Ok(stats)
    }
}

#[async_trait]
impl Reactor for DiscoveryApp {
    type Middleware = DiscoveryMiddleware;
    type Error = DiscoveryError;

    async fn handle_incoming(
        &mut self,
        middleware: &mut DiscoveryMiddleware,
        incoming: DiscoveryIncoming,
    ) -> Result<Timeout, DiscoveryError> {
        match (self.state, incoming) {
            (DiscoveryState::Register, DiscoveryIncoming::Request(request)) => {
                let response = self.service.handle_request(request);
                middleware.reply(&response)?;
                Ok(Timeout::Indefinite)
            }
            (_, DiscoveryIncoming::Shutdown) => {
                self.state = DiscoveryState::Completed;
                middleware.disable_event_loop();
                Ok(Timeout::Immediate)
            }
            (state, DiscoveryIncoming::Request(_)) => Err(DiscoveryError::UndefinedState {
                state,
                action: "request",
            }),
        }
    }

    async fn invoke_operation(
        &mut self,
        middleware: &mut DiscoveryMiddleware,
    ) -> Result<Timeout, DiscoveryError> {
        match self.state {
            DiscoveryState::Register => Ok(Timeout::Indefinite),
            DiscoveryState::Completed => {
                middleware.disable_event_loop();
                Ok(Timeout::Immediate)
            }
            state => {
                warn!(?state, "Discovery advanced from an unexpected state");
                Err(DiscoveryError::UndefinedState {
                    state,
                    action: "invoke_operation",
                })
            }
        }
    }
}
