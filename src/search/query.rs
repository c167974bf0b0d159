//! Distance filtering and ordering over a listing collection.

use crate::models::{LatLng, Listing, MatchedListing};
use tracing::debug;

/// Mean earth radius used by the web map's spherical CRS (meters).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two positions in meters (haversine).
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Listings within `radius_m` of `center`, nearest first.
///
/// Equal distances keep their input order. Listings with non-finite
/// coordinates never match. A NaN or negative radius matches nothing.
pub fn find_within_radius(center: LatLng, radius_m: f64, listings: &[Listing]) -> Vec<MatchedListing> {
    if !center.is_finite() || radius_m.is_nan() || radius_m < 0.0 {
        debug!(?center, radius_m, "Degenerate query, returning no matches");
        return Vec::new();
    }

    let mut matches: Vec<MatchedListing> = listings
        .iter()
        .filter(|listing| listing.position().is_finite())
        .filter_map(|listing| {
            let distance = haversine_distance(center, listing.position());
            (distance <= radius_m).then(|| MatchedListing {
                listing: listing.clone(),
                distance,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    debug!(
        lat = center.lat,
        lng = center.lng,
        radius_m,
        candidates = listings.len(),
        matched = matches.len(),
        "Radius query complete"
    );
    matches
}
