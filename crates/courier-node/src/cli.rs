//! Command-line flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Courier publish/subscribe node.
#[derive(Debug, Parser)]
#[command(name = "courier-node", version, about)]
pub struct Cli {
    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `debug`).
    #[arg(short = 'l', long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the discovery service.
    Discovery(DiscoveryArgs),
    /// Run the broker.
    Broker(BrokerArgs),
    /// Run a publisher.
    Publisher(ParticipantArgs),
    /// Run a subscriber.
    Subscriber(SubscriberArgs),
}

/// Flags every role shares.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Strategy configuration file; defaults apply when absent.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rate in messages (or rounds) per second.
    #[arg(short, long, default_value_t = 1)]
    pub frequency: u32,

    /// Iterations before the role completes.
    #[arg(short, long, default_value_t = 1000)]
    pub iters: usize,

    /// Seconds between readiness polls.
    #[arg(long, default_value_t = 10)]
    pub ready_backoff: u64,
}

impl CommonArgs {
    #[must_use]
    pub fn ready_backoff(&self) -> Duration {
        Duration::from_secs(self.ready_backoff)
    }
}

#[derive(Debug, Args)]
pub struct DiscoveryArgs {
    #[arg(short, long, default_value = "discovery")]
    pub name: String,

    /// Interface to bind.
    #[arg(short = 'r', long, default_value = "0.0.0.0")]
    pub addr: String,

    #[arg(short = 't', long, default_value_t = 5555)]
    pub port: u16,

    /// Publishers expected before the system is ready.
    #[arg(short = 'P', long, default_value_t = 1)]
    pub publishers: usize,

    /// Subscribers expected before the system is ready.
    #[arg(short = 'S', long, default_value_t = 1)]
    pub subscribers: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct BrokerArgs {
    #[arg(short, long, default_value = "broker")]
    pub name: String,

    /// Host advertised to discovery.
    #[arg(short = 'r', long, default_value = "localhost")]
    pub addr: String,

    #[arg(short, long, default_value_t = 5578)]
    pub port: u16,

    /// Discovery service as `host:port`.
    #[arg(short, long, default_value = "localhost:5555")]
    pub discovery: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ParticipantArgs {
    /// Defaults to `pub` or `sub`.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Host advertised to discovery.
    #[arg(short = 'a', long, default_value = "localhost")]
    pub addr: String,

    /// Defaults to 5577 for publishers, 5574 for subscribers.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Discovery service as `host:port`.
    #[arg(short, long, default_value = "localhost:5555")]
    pub discovery: String,

    /// Random topics to pick from the catalogue (at most 9).
    #[arg(short = 'T', long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub num_topics: u8,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SubscriberArgs {
    #[command(flatten)]
    pub participant: ParticipantArgs,

    /// Append every latency record to this file as JSON lines.
    #[arg(long)]
    pub latency_log: Option<PathBuf>,

    /// Seconds of silence after the last message before finishing short of
    /// the quota; 0 waits for the full quota.
    #[arg(long, default_value_t = 30)]
    pub idle_timeout: u64,
}

impl SubscriberArgs {
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout > 0).then(|| Duration::from_secs(self.idle_timeout))
    }
}
