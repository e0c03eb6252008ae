//! Spawns each role on an ephemeral localhost port.

use courier_broker::{BrokerApp, BrokerConfig, BrokerError, BrokerMiddleware};
use courier_discovery::{DiscoveryApp, DiscoveryConfig, DiscoveryMiddleware, ReadinessConfig};
use courier_participant::{
    ParticipantConfig, PublisherApp, PublisherError, PublisherMiddleware, SubscriberApp,
    SubscriberError, SubscriberMiddleware,
};
use courier_reactor::{EventLoop, LoopStats, TransportContext};
use courier_types::DisseminationMode;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Upper bound on any single flow.
pub const FLOW_TIMEOUT: Duration = Duration::from_secs(15);

const READY_BACKOFF: Duration = Duration::from_millis(20);

/// Subscribers finish this long after their sources go quiet.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(300);

pub type Running<A, E> = JoinHandle<(A, Result<LoopStats, E>)>;

/// Start discovery and return its address.
pub async fn start_discovery(
    ctx: &TransportContext,
    mode: DisseminationMode,
    publishers: usize,
    subscribers: usize,
) -> String {
    let event_loop = EventLoop::new("discovery");
    let mut mw = DiscoveryMiddleware::bind(ctx, "127.0.0.1:0", event_loop.handle())
        .await
        .unwrap();
    let addr = mw.local_addr().to_string();
    let mut app = DiscoveryApp::configure(DiscoveryConfig {
        dissemination: mode,
        readiness: ReadinessConfig::new(publishers, subscribers),
        ..DiscoveryConfig::default()
    });
    tokio::spawn(async move { app.driver(&event_loop, &mut mw).await });
    addr
}

pub fn participant(
    name: &str,
    topics: &[&str],
    mode: DisseminationMode,
    iters: usize,
) -> ParticipantConfig {
    let mut config = ParticipantConfig::new(name, topics.iter().map(|t| t.to_string()).collect());
    config.addr = "127.0.0.1".to_string();
    config.dissemination = mode;
    config.iters = iters;
    config.frequency = 100;
    config.ready_backoff = READY_BACKOFF;
    config.idle_timeout = Some(IDLE_TIMEOUT);
    config
}

pub async fn spawn_broker(
    ctx: &TransportContext,
    discovery: &str,
    iters: usize,
    frequency: u32,
) -> Running<BrokerApp, BrokerError> {
    let event_loop = EventLoop::new("broker");
    let mut mw = BrokerMiddleware::configure(ctx, discovery, "127.0.0.1:0", event_loop.handle())
        .await
        .unwrap();
    let mut app = BrokerApp::configure(BrokerConfig {
        addr: "127.0.0.1".to_string(),
        port: 0,
        iters,
        frequency,
        ready_backoff: READY_BACKOFF,
        ..BrokerConfig::default()
    })
    .unwrap();
    tokio::spawn(async move {
        let result = app.driver(&event_loop, &mut mw).await;
        (app, result)
    })
}

pub async fn spawn_publisher(
    ctx: &TransportContext,
    discovery: &str,
    config: ParticipantConfig,
) -> Running<PublisherApp, PublisherError> {
    let event_loop = EventLoop::new(config.name.clone());
    let mut mw = PublisherMiddleware::configure(ctx, discovery, "127.0.0.1:0", event_loop.handle())
        .await
        .unwrap();
    let mut app = PublisherApp::configure(config).unwrap();
    tokio::spawn(async move {
        let result = app.driver(&event_loop, &mut mw).await;
        (app, result)
    })
}

pub async fn spawn_subscriber(
    ctx: &TransportContext,
    discovery: &str,
    config: ParticipantConfig,
) -> Running<SubscriberApp, SubscriberError> {
    let event_loop = EventLoop::new(config.name.clone());
    let mut mw = SubscriberMiddleware::configure(ctx, discovery, event_loop.handle())
        .await
        .unwrap();
    let mut app = SubscriberApp::configure(config).unwrap();
    tokio::spawn(async move {
        let result = app.driver(&event_loop, &mut mw).await;
        (app, result)
    })
}

/// Wait for a spawned role and require a clean exit.
pub async fn finish<A, E: std::fmt::Debug>(running: Running<A, E>) -> (A, LoopStats) {
    let (app, result) = tokio::time::timeout(FLOW_TIMEOUT, running)
        .await
        .expect("role should finish in time")
        .expect("role task panicked");
    (app, result.expect("role failed"))
}
