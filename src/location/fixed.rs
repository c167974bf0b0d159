use crate::error::{GeolocationError, Result};
use crate::location::traits::LocationProvider;
use crate::location::types::PositionOptions;
use crate::models::{DeviceLocation, LatLng};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Provider that always answers with the same outcome.
///
/// Backs the `near --lat/--lng` and `near --deny` CLI modes and stands in
/// for the platform service in tests.
pub struct FixedLocationProvider {
    outcome: std::result::Result<LatLng, GeolocationError>,
    requests: AtomicUsize,
}

impl FixedLocationProvider {
    /// Resolve every request to `position`
    pub fn at(position: LatLng) -> Self {
        Self {
            outcome: Ok(position),
            requests: AtomicUsize::new(0),
        }
    }

    /// Fail every request with `error`
    pub fn failing(error: GeolocationError) -> Self {
        Self {
            outcome: Err(error),
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of position requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<DeviceLocation> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!(
            high_accuracy = options.enable_high_accuracy,
            "Fixed provider answering position request"
        );

        match &self.outcome {
            Ok(position) => Ok(DeviceLocation::new(*position)),
            Err(error) => Err(error.clone()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

/// Platform without any location API
#[derive(Debug, Default)]
pub struct UnsupportedLocationProvider;

#[async_trait]
impl LocationProvider for UnsupportedLocationProvider {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<DeviceLocation> {
        Err(GeolocationError::Unsupported)
    }

    fn provider_name(&self) -> &'static str {
        "unsupported"
    }
}
