//! Participant lifecycles as closed transition tables.

use thiserror::Error;

/// Lifecycle states of a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Initialize,
    Configure,
    Register,
    IsReady,
    CheckMsg,
    Receive,
    Completed,
}

/// Facts that move a subscriber between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberEvent {
    Configured,
    Started,
    Registered,
    NotReady,
    Ready,
    /// Subscribed to every endpoint discovery returned.
    Subscribed,
    /// Discovery returned no endpoint for our topics.
    NoSources,
    /// Received the planned number of messages.
    QuotaReached,
    /// Nothing arrived for the idle window after the last message.
    SourcesIdle,
}

/// Lifecycle states of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    Initialize,
    Configure,
    Register,
    IsReady,
    Disseminate,
    Completed,
}

/// Facts that move a publisher between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherEvent {
    Configured,
    Started,
    Registered,
    NotReady,
    Ready,
    /// Published the planned number of rounds.
    RoundsExhausted,
}

/// A `(state, event)` pair with no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Undefined subscriber transition from {state:?} on {event:?}")]
    Subscriber {
        state: SubscriberState,
        event: SubscriberEvent,
    },

    #[error("Undefined publisher transition from {state:?} on {event:?}")]
    Publisher {
        state: PublisherState,
        event: PublisherEvent,
    },
}

impl SubscriberState {
    /// Next state after `event`.
    pub fn on(self, event: SubscriberEvent) -> Result<Self, TransitionError> {
        use SubscriberEvent as E;
        use SubscriberState as S;

        match (self, event) {
            (S::Initialize, E::Configured) => Ok(S::Configure),
            (S::Configure, E::Started) => Ok(S::Register),
            (S::Register, E::Registered) => Ok(S::IsReady),
            (S::IsReady, E::NotReady) => Ok(S::IsReady),
            (S::IsReady, E::Ready) => Ok(S::CheckMsg),
            (S::CheckMsg, E::Subscribed) => Ok(S::Receive),
            (S::CheckMsg, E::NoSources) => Ok(S::Completed),
            (S::Receive, E::QuotaReached) => Ok(S::Completed),
            (S::Receive, E::SourcesIdle) => Ok(S::Completed),
            (state, event) => Err(TransitionError::Subscriber { state, event }),
        }
    }
}

impl PublisherState {
    /// Next state after `event`.
    pub fn on(self, event: PublisherEvent) -> Result<Self, TransitionError> {
        use PublisherEvent as E;
        use PublisherState as S;

        match (self, event) {
            (S::Initialize, E::Configured) => Ok(S::Configure),
            (S::Configure, E::Started) => Ok(S::Register),
            (S::Register, E::Registered) => Ok(S::IsReady),
            (S::IsReady, E::NotReady) => Ok(S::IsReady),
            (S::IsReady, E::Ready) => Ok(S::Disseminate),
            (S::Disseminate, E::RoundsExhausted) => Ok(S::Completed),
            (state, event) => Err(TransitionError::Publisher { state, event }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_path() {
        let end = [
            SubscriberEvent::Configured,
            SubscriberEvent::Started,
            SubscriberEvent::Registered,
            SubscriberEvent::Ready,
            SubscriberEvent::Subscribed,
            SubscriberEvent::QuotaReached,
        ]
        .iter()
        .try_fold(SubscriberState::Initialize, |s, e| s.on(*e))
        .unwrap();
        assert_eq!(end, SubscriberState::Completed);
    }

    #[test]
    fn test_subscriber_early_exits() {
        assert_eq!(
            SubscriberState::CheckMsg.on(SubscriberEvent::NoSources),
            Ok(SubscriberState::Completed)
        );
        assert_eq!(
            SubscriberState::Receive.on(SubscriberEvent::SourcesIdle),
            Ok(SubscriberState::Completed)
        );
        assert!(SubscriberState::IsReady.on(SubscriberEvent::NoSources).is_err());
        assert!(SubscriberState::CheckMsg.on(SubscriberEvent::SourcesIdle).is_err());
    }

    #[test]
    fn test_publisher_path() {
        let end = [
            PublisherEvent::Configured,
            PublisherEvent::Started,
            PublisherEvent::Registered,
            PublisherEvent::NotReady,
            PublisherEvent::Ready,
            PublisherEvent::RoundsExhausted,
        ]
        .iter()
        .try_fold(PublisherState::Initialize, |s, e| s.on(*e))
        .unwrap();
        assert_eq!(end, PublisherState::Completed);
    }

    #[test]
    fn test_undefined_transitions() {
        assert_eq!(
            SubscriberState::Receive.on(SubscriberEvent::Ready),
            Err(TransitionError::Subscriber {
                state: SubscriberState::Receive,
                event: SubscriberEvent::Ready
            })
        );
        assert!(PublisherState::Register.on(PublisherEvent::RoundsExhausted).is_err());
        assert!(PublisherState::Completed.on(PublisherEvent::Started).is_err());
    }
}
