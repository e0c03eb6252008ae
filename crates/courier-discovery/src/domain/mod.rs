//! Domain Layer - registry logic with no I/O

pub mod entities;
pub mod errors;
pub mod registry;

pub use entities::*;
pub use errors::*;
pub use registry::*;
