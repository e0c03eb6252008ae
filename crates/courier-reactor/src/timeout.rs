//! # Loop Timeouts
//!
//! Every upcall returns the timeout the loop uses on its next wait.

use std::time::Duration;

/// How long the next multiplexed wait may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Wait for data with no deadline; only the data path can fire.
    #[default]
    Indefinite,
    /// Return at once if nothing is pending, so the operation path fires
    /// on the next iteration.
    Immediate,
    /// Wait at most this long before advancing state.
    After(Duration),
}

impl Timeout {
    /// Pacing interval of `1 / frequency` seconds.
    ///
    /// A zero frequency disables pacing.
    #[must_use]
    pub fn pacing(frequency: u32) -> Self {
        if frequency == 0 {
            Self::Immediate
        } else {
            Self::After(Duration::from_secs_f64(1.0 / f64::from(frequency)))
        }
    }
}
