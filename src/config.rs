use crate::location::PositionOptions;
use crate::map::MapView;
use crate::models::LatLng;
use crate::search::DEFAULT_PROXIMITY_RADIUS_M;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the map search page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Map center used until a device location is known
    pub fallback_center: LatLng,
    pub fallback_zoom: u8,
    /// Zoom applied when recentering on the device
    pub located_zoom: u8,
    /// Radius of the "near me" search (meters)
    pub proximity_radius_m: f64,
    pub location: PositionOptions,
    /// Viewports narrower than this count as mobile
    pub mobile_breakpoint_px: u32,
}

impl SearchConfig {
    /// Read a JSON config file; missing fields keep their defaults
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: SearchConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fallback_center.is_finite() {
            bail!("fallback_center must have finite coordinates");
        }
        if !(self.proximity_radius_m.is_finite() && self.proximity_radius_m > 0.0) {
            bail!("proximity_radius_m must be a positive number, got {}", self.proximity_radius_m);
        }
        if self.location.timeout_ms == 0 {
            bail!("location.timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn fallback_view(&self) -> MapView {
        MapView {
            center: self.fallback_center,
            zoom: self.fallback_zoom,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            // Salvador, BA
            fallback_center: LatLng::new(-12.9777, -38.5016),
            fallback_zoom: 13,
            located_zoom: 14,
            proximity_radius_m: DEFAULT_PROXIMITY_RADIUS_M,
            location: PositionOptions::default(),
            mobile_breakpoint_px: 768,
        }
    }
}
