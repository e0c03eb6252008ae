use courier_types::DisseminationMode;

use crate::domain::{ReadinessConfig, Registry};

/// Discovery service implementing the driving port.
///
/// Wraps the [`Registry`] together with the process-wide dissemination
/// mode, which decides how topic lookups resolve.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    pub(crate) registry: Registry,
    pub(crate) mode: DisseminationMode,
}

impl DiscoveryService {
    /// Create a service with an empty registry.
    ///
    /// # Arguments
    ///
    /// * `readiness` - Expected publisher and subscriber counts
    /// * `mode` - Dissemination mode shared by every role
    #[must_use]
    pub fn new(readiness: ReadinessConfig, mode: DisseminationMode) -> Self {
        Self {
            registry: Registry::new(readiness),
            mode,
        }
    }

    /// Read-only view of the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Configured dissemination mode.
    #[must_use]
    pub fn mode(&self) -> DisseminationMode {
        self.mode
    }
}
