use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for a single location request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PositionOptions {
    /// Ask the provider for its most precise fix
    pub enable_high_accuracy: bool,
    /// Upper bound on the wait for a position (milliseconds)
    pub timeout_ms: u64,
    /// Oldest cached fix the provider may hand back (milliseconds); 0 disables reuse
    pub maximum_age_ms: u64,
}

impl PositionOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 15_000,
            maximum_age_ms: 0,
        }
    }
}
