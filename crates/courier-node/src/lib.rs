//! # Courier Node
//!
//! Process entry point for every Courier role.
//!
//! ## Modular Structure
//!
//! - `cli` - Command-line flags, one subcommand per role
//! - `config` - Strategy configuration (TOML file or static)
//! - `latency_log` - JSON-lines sink for subscriber latency records
//! - `roles` - Wires transport, middleware and application per role
//!
//! ## Startup Sequence
//!
//! 1. Parse flags and install the tracing subscriber
//! 2. Load the strategy configuration
//! 3. Create the transport context and the role's middleware
//! 4. Run the role's lifecycle until it completes or Ctrl+C arrives

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod latency_log;
pub mod roles;

pub use cli::{Cli, Command};
pub use config::{ConfigError, StaticStrategyConfig, StrategyProvider, TomlStrategyConfig};
pub use latency_log::JsonLinesSink;
