#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_galileo_free_snapshots() -> u32 {
    1
}

fn default_stop_on_decision() -> bool {
    true
}

/// [crate::session::SessionController] configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// Consecutive snapshots without a single Galileo vehicle
    /// required before we conclude Galileo is not available.
    #[cfg_attr(feature = "serde", serde(default = "default_galileo_free_snapshots"))]
    pub galileo_free_snapshots: u32,
    /// Stop listening to the signal source once the outcome is persisted
    #[cfg_attr(feature = "serde", serde(default = "default_stop_on_decision"))]
    pub stop_on_decision: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            galileo_free_snapshots: default_galileo_free_snapshots(),
            stop_on_decision: default_stop_on_decision(),
        }
    }
}

impl SessionConfig {
    /// Copies and sets the Galileo free snapshots threshold.
    /// Zero is treated as one.
    pub fn with_galileo_free_snapshots(&self, snapshots: u32) -> Self {
        let mut s = *self;
        s.galileo_free_snapshots = snapshots.max(1);
        s
    }
    /// Copies and sets whether we stop listening once determined
    pub fn with_stop_on_decision(&self, stop: bool) -> Self {
        let mut s = *self;
        s.stop_on_decision = stop;
        s
    }
}
