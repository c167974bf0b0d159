pub mod headless;

pub use headless::{HeadlessMap, Overlay};

use crate::models::{LatLng, SearchShape};
use crate::search::query::haversine_distance;

/// Owned reference to one overlay on the map.
///
/// Not `Clone`: whoever holds it is the only party that can remove the overlay.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Map view: center plus zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Primitives the search page needs from an interactive map
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);

    fn view(&self) -> MapView;

    fn add_circle(&mut self, shape: &SearchShape) -> OverlayHandle;

    fn add_marker(&mut self, position: LatLng) -> OverlayHandle;

    fn remove_overlay(&mut self, handle: OverlayHandle);

    /// Turn the interactive circle-drawing tool on or off
    fn set_draw_tool(&mut self, enabled: bool);

    /// Distance convention used to draw circle boundaries (meters)
    fn distance(&self, a: LatLng, b: LatLng) -> f64 {
        haversine_distance(a, b)
    }
}
