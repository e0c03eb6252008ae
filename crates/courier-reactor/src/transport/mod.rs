//! # TCP Transport
//!
//! Four socket flavours over plain TCP, each created from an explicitly
//! owned [`TransportContext`]:
//!
//! | Socket | Binds/Connects | Pattern |
//! |---|---|---|
//! | [`RequestSocket`] | connects to one peer | strict send/recv alternation |
//! | [`ReplySocket`] | binds, many peers | recv from any, reply to that one |
//! | [`PublishSocket`] | binds, many peers | fan-out with prefix filters |
//! | [`SubscribeSocket`] | connects to many peers | fan-in |
//!
//! Every frame is a 4-byte big-endian length followed by the body.
//! Background tasks only move bytes; inbound data reaches the owning role
//! through channels so a wait can be abandoned without losing anything.

pub mod context;
pub mod frame;
pub mod publish;
pub mod reply;
pub mod request;
pub mod subscribe;

pub use context::{ShutdownSignal, TransportContext};
pub use frame::SubscriptionCommand;
pub use publish::PublishSocket;
pub use reply::ReplySocket;
pub use request::RequestSocket;
pub use subscribe::SubscribeSocket;
