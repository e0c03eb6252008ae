//! Domain Layer - broker lifecycle and relay buffer

pub mod buffer;
pub mod state;

pub use buffer::RelayBuffer;
pub use state::{BrokerEvent, BrokerState, TransitionError};
