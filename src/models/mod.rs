use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A property listing as supplied by the listings collaborator.
///
/// Read-only here: the spatial search only looks at the id, the
/// coordinates and the fields it echoes back for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub address: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Listing {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// User-drawn search circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchShape {
    pub center: LatLng,
    pub radius_m: f64,
}

impl SearchShape {
    pub fn circle(center: LatLng, radius_m: f64) -> Self {
        Self { center, radius_m }
    }
}

/// A listing together with its distance (meters) from the query's reference point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub distance: f64,
}

/// Position reported by a location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceLocation {
    pub position: LatLng,
    /// Accuracy radius in meters, when the provider reports one
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl DeviceLocation {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            accuracy_m: None,
            timestamp: Utc::now(),
        }
    }
}

/// Load the candidate listing set from a JSON array on disk
pub async fn load_listings(path: impl AsRef<Path>) -> Result<Vec<Listing>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read listings from {}", path.display()))?;
    let listings: Vec<Listing> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse listings in {}", path.display()))?;

    tracing::info!("Loaded {} listings from {}", listings.len(), path.display());
    Ok(listings)
}
