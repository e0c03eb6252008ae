//! # Event Loop
//!
//! The reactive core every role embeds.
//!
//! Each iteration waits on the middleware's endpoints for at most the
//! current [`Timeout`], then makes exactly one upcall:
//!
//! - data arrived: [`Reactor::handle_incoming`]
//! - wait elapsed: [`Reactor::invoke_operation`]
//!
//! Both return the next timeout. Because only one upcall happens per
//! iteration, the application object sees at most one state transition
//! per tick and needs no locking.
//!
//! The application receives the middleware as an argument on every upcall
//! instead of holding a back-reference to it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::timeout::Timeout;

/// The transport half of a role: owns the polled endpoints.
#[async_trait]
pub trait Middleware: Send {
    /// One parsed inbound message.
    type Incoming: Send;

    /// Wait until one of the polled endpoints yields a message.
    ///
    /// Must be cancel-safe: the loop drops this future when its timeout
    /// elapses, and no data may be lost when that happens.
    async fn next_incoming(&mut self) -> Result<Self::Incoming, TransportError>;
}

/// The application half of a role: owns the state machine.
#[async_trait]
pub trait Reactor: Send {
    /// Middleware this application drives.
    type Middleware: Middleware;
    /// Terminal error type of this role.
    type Error: From<TransportError> + Send;

    /// Data path: an endpoint was readable and produced `incoming`.
    async fn handle_incoming(
        &mut self,
        middleware: &mut Self::Middleware,
        incoming: <Self::Middleware as Middleware>::Incoming,
    ) -> Result<Timeout, Self::Error>;

    /// Timeout path: perform exactly one state action.
    async fn invoke_operation(
        &mut self,
        middleware: &mut Self::Middleware,
    ) -> Result<Timeout, Self::Error>;
}

/// Clonable sentinel that stops an [`EventLoop`].
///
/// Disabling takes effect at the next iteration boundary; the in-flight
/// iteration always completes.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    enabled: Arc<AtomicBool>,
}

impl LoopHandle {
    fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Ask the loop to exit after the current iteration.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Whether the loop keeps running.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

/// Counters reported when a loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Completed iterations.
    pub iterations: u64,
    /// Iterations that took the data path.
    pub incoming: u64,
    /// Iterations that took the timeout path.
    pub operations: u64,
}

/// Single-threaded cooperative event loop.
#[derive(Debug)]
pub struct EventLoop {
    name: String,
    handle: LoopHandle,
}

impl EventLoop {
    /// Create an enabled loop.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: LoopHandle::new(),
        }
    }

    /// A handle the middleware keeps so the application can stop the loop.
    #[must_use]
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run until disabled or until an upcall fails.
    ///
    /// # Arguments
    ///
    /// * `reactor` - Application object receiving upcalls
    /// * `middleware` - Endpoints to wait on
    /// * `initial` - Timeout for the first wait
    pub async fn run<R: Reactor>(
        &self,
        reactor: &mut R,
        middleware: &mut R::Middleware,
        initial: Timeout,
    ) -> Result<LoopStats, R::Error> {
        let mut timeout = initial;
        let mut stats = LoopStats::default();
        info!(name = %self.name, ?timeout, "Event loop started");

        while self.handle.is_enabled() {
            stats.iterations += 1;
            timeout = match Self::wait(middleware, timeout).await? {
                Some(incoming) => {
                    stats.incoming += 1;
                    reactor.handle_incoming(middleware, incoming).await?
                }
                None => {
                    stats.operations += 1;
                    reactor.invoke_operation(middleware).await?
                }
            };
            debug!(name = %self.name, iteration = stats.iterations, ?timeout, "Iteration complete");
        }

        info!(
            name = %self.name,
            iterations = stats.iterations,
            incoming = stats.incoming,
            operations = stats.operations,
            "Event loop exited"
        );
        Ok(stats)
    }

    /// Multiplexed wait bounded by `timeout`.
    async fn wait<M: Middleware>(
        middleware: &mut M,
        timeout: Timeout,
    ) -> Result<Option<M::Incoming>, TransportError> {
        match timeout {
            Timeout::Indefinite => middleware.next_incoming().await.map(Some),
            Timeout::Immediate => {
                // let socket tasks deliver whatever already reached us
                tokio::task::yield_now().await;
                Self::bounded(middleware, Duration::ZERO).await
            }
            Timeout::After(limit) => Self::bounded(middleware, limit).await,
        }
    }

    async fn bounded<M: Middleware>(
        middleware: &mut M,
        limit: Duration,
    ) -> Result<Option<M::Incoming>, TransportError> {
        match tokio::time::timeout(limit, middleware.next_incoming()).await {
            Ok(incoming) => incoming.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }
}
