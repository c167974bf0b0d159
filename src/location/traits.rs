use crate::error::Result;
use crate::location::types::PositionOptions;
use crate::models::DeviceLocation;
use async_trait::async_trait;

/// Source of the device's current position.
/// Injected into the proximity flow so the platform service can be swapped out (or faked in tests).
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the platform offers a location API at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Resolve the current position once
    async fn current_position(&self, options: &PositionOptions) -> Result<DeviceLocation>;

    /// Name used in logs
    fn provider_name(&self) -> &'static str;
}
