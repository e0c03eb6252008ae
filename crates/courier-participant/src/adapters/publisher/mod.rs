//! Publisher role.

pub mod app;
pub mod middleware;

pub use app::{PublisherApp, PublisherError};
pub use middleware::PublisherMiddleware;
