//! # Role Runners
//!
//! Each runner creates the transport context, builds the role's middleware
//! and application, and drives the lifecycle until it completes or the
//! process is interrupted.

use anyhow::{Context, Result};
use courier_broker::{BrokerApp, BrokerConfig, BrokerMiddleware};
use courier_discovery::{DiscoveryApp, DiscoveryConfig, DiscoveryMiddleware, ReadinessConfig};
use courier_participant::{
    ParticipantConfig, PublisherApp, PublisherMiddleware, SubscriberApp, SubscriberMiddleware,
    TopicSelector,
};
use courier_reactor::{EventLoop, TransportContext};
use std::future::Future;
use tracing::{info, warn};

use crate::cli::{BrokerArgs, DiscoveryArgs, ParticipantArgs, SubscriberArgs};
use crate::config::load_strategy;
use crate::latency_log::JsonLinesSink;

/// Run `lifecycle` until it finishes or Ctrl+C arrives.
async fn until_interrupted<T, F>(ctx: &TransportContext, lifecycle: F) -> Result<()>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = lifecycle => result.map(|_| ()),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            warn!("Interrupted; shutting down");
            ctx.shutdown();
            Ok(())
        }
    }
}

const PUBLISHER_DEFAULTS: (&str, u16) = ("pub", 5577);
const SUBSCRIBER_DEFAULTS: (&str, u16) = ("sub", 5574);

fn participant_config(
    args: &ParticipantArgs,
    (name, port): (&str, u16),
) -> Result<ParticipantConfig> {
    let strategy = load_strategy(args.common.config.as_deref())?;
    let topics = TopicSelector::new().interest(usize::from(args.num_topics));
    let name = args.name.clone().unwrap_or_else(|| name.to_string());
    let mut config = ParticipantConfig::new(name, topics);
    config.addr = args.addr.clone();
    config.port = args.port.unwrap_or(port);
    config.lookup = strategy.lookup_strategy();
    config.dissemination = strategy.dissemination();
    config.iters = args.common.iters;
    config.frequency = args.common.frequency;
    config.ready_backoff = args.common.ready_backoff();
    Ok(config)
}

fn subscriber_config(args: &SubscriberArgs) -> Result<ParticipantConfig> {
    let mut config = participant_config(&args.participant, SUBSCRIBER_DEFAULTS)?;
    config.idle_timeout = args.idle_timeout();
    Ok(config)
}

pub async fn run_discovery(args: DiscoveryArgs) -> Result<()> {
    let strategy = load_strategy(args.common.config.as_deref())?;
    let ctx = TransportContext::new();
    let event_loop = EventLoop::new(args.name.clone());

    let bind = format!("{}:{}", args.addr, args.port);
    let mut middleware = DiscoveryMiddleware::bind(&ctx, &bind, event_loop.handle())
        .await
        .with_context(|| format!("Discovery could not bind {bind}"))?;
    let mut app = DiscoveryApp::configure(DiscoveryConfig {
        name: args.name,
        lookup: strategy.lookup_strategy(),
        dissemination: strategy.dissemination(),
        readiness: ReadinessConfig::new(args.publishers, args.subscribers),
    });

    info!(addr = %middleware.local_addr(), "Discovery listening");
    until_interrupted(&ctx, async {
        app.driver(&event_loop, &mut middleware)
            .await
            .context("Discovery failed")
    })
    .await
}

pub async fn run_broker(args: BrokerArgs) -> Result<()> {
    let strategy = load_strategy(args.common.config.as_deref())?;
    let ctx = TransportContext::new();
    let event_loop = EventLoop::new(args.name.clone());

    let bind = format!("0.0.0.0:{}", args.port);
    let mut middleware =
        BrokerMiddleware::configure(&ctx, &args.discovery, &bind, event_loop.handle())
            .await
            .context("Broker middleware setup failed")?;
    let mut app = BrokerApp::configure(BrokerConfig {
        name: args.name,
        addr: args.addr,
        port: args.port,
        lookup: strategy.lookup_strategy(),
        dissemination: strategy.dissemination(),
        iters: args.common.iters,
        frequency: args.common.frequency,
        ready_backoff: args.common.ready_backoff(),
    })?;

    until_interrupted(&ctx, async {
        app.driver(&event_loop, &mut middleware)
            .await
            .context("Broker failed")
    })
    .await
}

pub async fn run_publisher(args: ParticipantArgs) -> Result<()> {
    let config = participant_config(&args, PUBLISHER_DEFAULTS)?;
    let ctx = TransportContext::new();
    let event_loop = EventLoop::new(config.name.clone());

    let bind = format!("0.0.0.0:{}", config.port);
    let mut middleware =
        PublisherMiddleware::configure(&ctx, &args.discovery, &bind, event_loop.handle())
            .await
            .context("Publisher middleware setup failed")?;
    let mut app = PublisherApp::configure(config)?;

    until_interrupted(&ctx, async {
        app.driver(&event_loop, &mut middleware)
            .await
            .context("Publisher failed")
    })
    .await
}

pub async fn run_subscriber(args: SubscriberArgs) -> Result<()> {
    let config = subscriber_config(&args)?;
    let ctx = TransportContext::new();
    let event_loop = EventLoop::new(config.name.clone());

    let mut middleware =
        SubscriberMiddleware::configure(&ctx, &args.participant.discovery, event_loop.handle())
            .await
            .context("Subscriber middleware setup failed")?;
    let mut app = SubscriberApp::configure(config)?;
    if let Some(path) = &args.latency_log {
        let sink = JsonLinesSink::append(path)
            .with_context(|| format!("Cannot open latency log {}", path.display()))?;
        app = app.with_sink(Box::new(sink));
    }

    until_interrupted(&ctx, async {
        app.driver(&event_loop, &mut middleware)
            .await
            .context("Subscriber failed")
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use courier_types::DisseminationMode;

    fn subscriber_args(extra: &[&str]) -> SubscriberArgs {
        let argv = ["courier-node", "subscriber"].into_iter().chain(extra.iter().copied());
        match Cli::parse_from(argv).command {
            Command::Subscriber(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_subscriber_defaults() {
        let args = subscriber_args(&["-T", "4"]);
        let config = subscriber_config(&args).unwrap();
        assert_eq!(config.name, "sub");
        assert_eq!(config.port, 5574);
        assert_eq!(config.topics.len(), 4);
        assert_eq!(config.dissemination, DisseminationMode::Direct);
        assert_eq!(config.lookup, "Centralized");
        assert_eq!(config.ready_backoff, std::time::Duration::from_secs(10));
        assert_eq!(config.idle_timeout, Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn test_idle_timeout_flag_reaches_config() {
        let args = subscriber_args(&["--idle-timeout", "0"]);
        assert_eq!(subscriber_config(&args).unwrap().idle_timeout, None);
        let args = subscriber_args(&["--idle-timeout", "2"]);
        assert_eq!(
            subscriber_config(&args).unwrap().idle_timeout,
            Some(std::time::Duration::from_secs(2))
        );
    }

    #[test]
    fn test_explicit_flags_win() {
        let args = subscriber_args(&["--name", "s9", "--port", "7000", "--iters", "5"]);
        let config = participant_config(&args.participant, PUBLISHER_DEFAULTS).unwrap();
        assert_eq!(config.name, "s9");
        assert_eq!(config.port, 7000);
        assert_eq!(config.iters, 5);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = subscriber_args(&["--config", "/nonexistent/courier.toml"]);
        assert!(participant_config(&args.participant, SUBSCRIBER_DEFAULTS).is_err());
    }
}
