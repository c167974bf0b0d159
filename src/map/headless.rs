use crate::map::{MapSurface, MapView, OverlayHandle};
use crate::models::{LatLng, SearchShape};
use std::collections::BTreeMap;
use tracing::debug;

/// Something drawn on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    Circle(SearchShape),
    Marker(LatLng),
}

/// In-memory map surface for the CLI and tests
#[derive(Debug)]
pub struct HeadlessMap {
    view: MapView,
    overlays: BTreeMap<u64, Overlay>,
    next_id: u64,
    draw_tool_enabled: bool,
}

impl HeadlessMap {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            overlays: BTreeMap::new(),
            next_id: 1,
            draw_tool_enabled: false,
        }
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn circle_count(&self) -> usize {
        self.overlays()
            .filter(|o| matches!(o, Overlay::Circle(_)))
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.overlays()
            .filter(|o| matches!(o, Overlay::Marker(_)))
            .count()
    }

    pub fn draw_tool_enabled(&self) -> bool {
        self.draw_tool_enabled
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.overlays.insert(id, overlay);
        debug!(id, ?overlay, "Overlay added");
        OverlayHandle::new(id)
    }
}

impl MapSurface for HeadlessMap {
    fn set_view(&mut self, view: MapView) {
        debug!(lat = view.center.lat, lng = view.center.lng, zoom = view.zoom, "View changed");
        self.view = view;
    }

    fn view(&self) -> MapView {
        self.view
    }

    fn add_circle(&mut self, shape: &SearchShape) -> OverlayHandle {
        self.insert(Overlay::Circle(*shape))
    }

    fn add_marker(&mut self, position: LatLng) -> OverlayHandle {
        self.insert(Overlay::Marker(position))
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        if self.overlays.remove(&handle.id()).is_none() {
            debug!(id = handle.id(), "Overlay already gone");
        }
    }

    fn set_draw_tool(&mut self, enabled: bool) {
        self.draw_tool_enabled = enabled;
    }
}
