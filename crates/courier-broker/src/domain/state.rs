//! Broker lifecycle as a closed transition table.

use thiserror::Error;

/// Lifecycle states of the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Initialize,
    Configure,
    Register,
    IsReady,
    CheckMsg,
    ReceiveFromPub,
    Disseminate,
    Completed,
}

/// Facts that move the broker between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerEvent {
    /// Sockets created and parameters applied.
    Configured,
    /// The event loop started.
    Started,
    /// Discovery accepted the registration.
    Registered,
    /// Discovery reports the population incomplete.
    NotReady,
    /// Discovery reports the population complete.
    Ready,
    /// Connected to every publisher in the roster.
    RosterConnected,
    /// The buffer holds a full batch.
    BatchFull,
    /// Every buffered message went out.
    BufferDrained,
}

/// A `(state, event)` pair with no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Undefined transition from {state:?} on {event:?}")]
pub struct TransitionError {
    pub state: BrokerState,
    pub event: BrokerEvent,
}

impl BrokerState {
    /// Next state after `event`.
    pub fn on(self, event: BrokerEvent) -> Result<Self, TransitionError> {
        use BrokerEvent as E;
        use BrokerState as S;

        match (self, event) {
            (S::Initialize, E::Configured) => Ok(S::Configure),
            (S::Configure, E::Started) => Ok(S::Register),
            (S::Register, E::Registered) => Ok(S::IsReady),
            (S::IsReady, E::NotReady) => Ok(S::IsReady),
            (S::IsReady, E::Ready) => Ok(S::CheckMsg),
            (S::CheckMsg, E::RosterConnected) => Ok(S::ReceiveFromPub),
            (S::ReceiveFromPub, E::BatchFull) => Ok(S::Disseminate),
            (S::Disseminate, E::BufferDrained) => Ok(S::Completed),
            (state, event) => Err(TransitionError { state, event }),
        }
    }
}
