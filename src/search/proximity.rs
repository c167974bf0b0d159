//! "Near me" search: resolve the device position, then query a fixed radius around it.

use crate::error::{GeolocationError, Result};
use crate::location::{LocationProvider, PositionOptions};
use crate::models::{DeviceLocation, Listing, MatchedListing};
use crate::search::query::find_within_radius;
use tokio::time::timeout;
use tracing::{info, warn};

/// Default search radius around the device (meters)
pub const DEFAULT_PROXIMITY_RADIUS_M: f64 = 5_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProximityStatus {
    #[default]
    Inactive,
    Locating,
    Located(DeviceLocation),
}

#[derive(Debug, Clone)]
pub struct ProximitySession {
    status: ProximityStatus,
    options: PositionOptions,
    radius_m: f64,
}

impl ProximitySession {
    pub fn new(options: PositionOptions, radius_m: f64) -> Self {
        Self {
            status: ProximityStatus::Inactive,
            options,
            radius_m,
        }
    }

    pub fn status(&self) -> ProximityStatus {
        self.status
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn device_location(&self) -> Option<&DeviceLocation> {
        match &self.status {
            ProximityStatus::Located(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn is_locating(&self) -> bool {
        matches!(self.status, ProximityStatus::Locating)
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Mark a location request as outstanding.
    ///
    /// Fails with `Unsupported` when the provider has no location API; the
    /// session is then left `Inactive` and no request should be made.
    pub fn begin(&mut self, provider: &dyn LocationProvider) -> Result<()> {
        if !provider.is_supported() {
            warn!("Provider '{}' has no location support", provider.provider_name());
            self.status = ProximityStatus::Inactive;
            return Err(GeolocationError::Unsupported);
        }

        self.status = ProximityStatus::Locating;
        info!(
            provider = provider.provider_name(),
            timeout_ms = self.options.timeout_ms,
            high_accuracy = self.options.enable_high_accuracy,
            "Requesting device location"
        );
        Ok(())
    }

    /// Settle the outstanding request with the provider's answer.
    ///
    /// On failure the session falls back to `Inactive` and keeps nothing.
    pub fn finish(&mut self, outcome: Result<DeviceLocation>) -> Result<DeviceLocation> {
        match outcome {
            Ok(fix) if !fix.position.is_finite() => {
                warn!("Discarding non-finite device position");
                self.status = ProximityStatus::Inactive;
                Err(GeolocationError::Unavailable(
                    "provider returned a non-finite position".to_string(),
                ))
            }
            Ok(fix) => {
                info!(lat = fix.position.lat, lng = fix.position.lng, "Device located");
                self.status = ProximityStatus::Located(fix);
                Ok(fix)
            }
            Err(e) => {
                warn!("Device location failed: {}", e);
                self.status = ProximityStatus::Inactive;
                Err(e)
            }
        }
    }

    /// Ask `provider` for the device position, waiting at most the configured timeout.
    pub async fn locate(&mut self, provider: &dyn LocationProvider) -> Result<DeviceLocation> {
        self.begin(provider)?;
        let outcome = request_position(provider, &self.options).await;
        self.finish(outcome)
    }

    /// Listings within the proximity radius of the resolved location.
    /// Empty while no location is resolved.
    pub fn search(&self, listings: &[Listing]) -> Vec<MatchedListing> {
        match self.device_location() {
            Some(fix) => find_within_radius(fix.position, self.radius_m, listings),
            None => Vec::new(),
        }
    }

    /// Leave proximity mode, discarding the location
    pub fn exit(&mut self) {
        self.status = ProximityStatus::Inactive;
    }
}

/// One bounded position request.
///
/// Resolves to `Timeout` if the provider has not answered within
/// `options.timeout`, and to `Unavailable` for a non-finite fix.
pub async fn request_position(
    provider: &dyn LocationProvider,
    options: &PositionOptions,
) -> Result<DeviceLocation> {
    match timeout(options.timeout(), provider.current_position(options)).await {
        Ok(Ok(fix)) if fix.position.is_finite() => Ok(fix),
        Ok(Ok(_)) => Err(GeolocationError::Unavailable(
            "provider returned a non-finite position".to_string(),
        )),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GeolocationError::Timeout(options.timeout())),
    }
}

impl Default for ProximitySession {
    fn default() -> Self {
        Self::new(PositionOptions::default(), DEFAULT_PROXIMITY_RADIUS_M)
    }
}
