//! Registration conflicts.
//!
//! The `Display` text of each variant is the `reason` sent back on the
//! wire, so keep it stable.

use courier_types::Role;
use thiserror::Error;

/// Why a registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The id already exists in the bucket for this role.
    #[error("{role} name is not unique")]
    DuplicateId { role: Role, id: String },

    /// A broker is already registered.
    #[error("only one broker allowed")]
    BrokerAlreadyRegistered { existing: String },
}
