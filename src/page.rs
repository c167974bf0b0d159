//! Map search page: owns the listings, the map overlays and both search modes,
//! and turns session effects into map calls and observer notifications.

use crate::config::SearchConfig;
use crate::error::GeolocationError;
use crate::location::{LocationProvider, PositionOptions};
use crate::map::{MapSurface, MapView, OverlayHandle};
use crate::models::{DeviceLocation, LatLng, Listing, MatchedListing, SearchShape};
use crate::search::{
    find_within_radius, request_position, DrawEffect, DrawEvent, DrawSession, DrawState, ProximitySession,
    ResultsPanel, Viewport,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Notifications the page hands to its embedding UI
pub trait SearchObserver {
    /// A query ran (or results were cleared); `matches` is nearest first
    fn on_properties_found(&mut self, matches: &[MatchedListing]);

    /// The device location could not be resolved
    fn on_geolocation_error(&mut self);

    fn on_loading_changed(&mut self, _loading: bool) {}
}

/// Observer that keeps everything it is told
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub found: Vec<Vec<MatchedListing>>,
    pub geolocation_errors: usize,
    pub loading: Vec<bool>,
}

impl RecordingObserver {
    pub fn last_found(&self) -> Option<&[MatchedListing]> {
        self.found.last().map(Vec::as_slice)
    }
}

impl SearchObserver for RecordingObserver {
    fn on_properties_found(&mut self, matches: &[MatchedListing]) {
        self.found.push(matches.to_vec());
    }

    fn on_geolocation_error(&mut self) {
        self.geolocation_errors += 1;
    }

    fn on_loading_changed(&mut self, loading: bool) {
        self.loading.push(loading);
    }
}

/// Which buttons and indicators the page should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlsView {
    pub draw_enabled: bool,
    pub drawing_in_progress: bool,
    pub clear_visible: bool,
    pub panel_toggle_visible: bool,
    pub locate_enabled: bool,
    pub loading: bool,
}

pub struct SearchPage<M: MapSurface, O: SearchObserver> {
    config: SearchConfig,
    listings: Vec<Listing>,
    map: M,
    observer: O,
    draw: DrawSession,
    proximity: ProximitySession,
    shape_overlay: Option<OverlayHandle>,
    marker_overlay: Option<OverlayHandle>,
    results: Vec<MatchedListing>,
    panel: ResultsPanel,
}

impl<M: MapSurface, O: SearchObserver> SearchPage<M, O> {
    pub fn new(config: SearchConfig, listings: Vec<Listing>, mut map: M, observer: O) -> Self {
        map.set_view(config.fallback_view());
        let proximity = ProximitySession::new(config.location, config.proximity_radius_m);

        Self {
            config,
            listings,
            map,
            observer,
            draw: DrawSession::new(),
            proximity,
            shape_overlay: None,
            marker_overlay: None,
            results: Vec::new(),
            panel: ResultsPanel::new(Viewport::Desktop),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn draw_state(&self) -> DrawState {
        self.draw.state()
    }

    pub fn search_shape(&self) -> Option<&SearchShape> {
        self.draw.shape()
    }

    pub fn device_location(&self) -> Option<&DeviceLocation> {
        self.proximity.device_location()
    }

    pub fn results(&self) -> &[MatchedListing] {
        &self.results
    }

    pub fn match_count(&self) -> usize {
        self.results.len()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn controls(&self) -> ControlsView {
        let state = self.draw.state();
        ControlsView {
            draw_enabled: state != DrawState::Drawing && !self.draw.is_suppressed(),
            drawing_in_progress: state == DrawState::Drawing,
            clear_visible: state == DrawState::Drawn,
            panel_toggle_visible: self.panel.toggle_visible(),
            locate_enabled: !self.proximity.is_locating(),
            loading: self.proximity.is_locating(),
        }
    }

    pub fn set_viewport_width(&mut self, width_px: u32) {
        self.panel
            .set_viewport(Viewport::from_width(width_px, self.config.mobile_breakpoint_px));
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.panel.toggle()
    }

    /// Swap in a fresh listing set and re-run whichever query is active
    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        if let Some(shape) = self.draw.shape().copied() {
            self.run_query(shape.center, shape.radius_m);
        } else if let Some(fix) = self.proximity.device_location().copied() {
            self.run_query(fix.position, self.proximity.radius_m());
        }
    }

    /// Feed a draw event (user action or map tool callback) through the draw session
    pub fn handle_draw_event(&mut self, event: DrawEvent) {
        let effects = self.draw.dispatch(event);
        for effect in effects {
            self.apply(effect);
        }
    }

    pub fn request_draw(&mut self) {
        self.handle_draw_event(DrawEvent::RequestDraw);
    }

    pub fn shape_created(&mut self, shape: SearchShape) {
        self.handle_draw_event(DrawEvent::ShapeCreated(shape));
    }

    pub fn drawing_stopped(&mut self) {
        self.handle_draw_event(DrawEvent::DrawingStopped);
    }

    pub fn cancel_drawing(&mut self) {
        self.handle_draw_event(DrawEvent::Cancel);
    }

    pub fn clear_drawing(&mut self) {
        self.handle_draw_event(DrawEvent::RequestClear);
    }

    /// Options handed to the location provider
    pub fn location_options(&self) -> &PositionOptions {
        self.proximity.options()
    }

    /// Switch to "near me": resolve the device location and search around it.
    ///
    /// Failures are reported through `on_geolocation_error` and leave the map
    /// on its fallback view with no results.
    pub async fn locate(&mut self, provider: &dyn LocationProvider) {
        if !self.begin_locate(provider) {
            return;
        }
        let options = *self.proximity.options();
        let outcome = request_position(provider, &options).await;
        self.complete_locate(outcome);
    }

    /// Enter proximity mode and mark a location request as outstanding.
    ///
    /// Returns false when no request should be made: one is already pending,
    /// or the platform has no location support (already reported).
    pub fn begin_locate(&mut self, provider: &dyn LocationProvider) -> bool {
        if self.proximity.is_locating() {
            debug!("Location request already outstanding");
            return false;
        }

        self.handle_draw_event(DrawEvent::ProximityEngaged);
        if let Some(marker) = self.marker_overlay.take() {
            self.map.remove_overlay(marker);
        }
        if !self.results.is_empty() {
            self.clear_results();
        }

        match self.proximity.begin(provider) {
            Ok(()) => {
                self.observer.on_loading_changed(true);
                true
            }
            Err(e) => {
                self.fail_locate(e);
                false
            }
        }
    }

    /// Settle the outstanding location request started by `begin_locate`
    pub fn complete_locate(&mut self, outcome: Result<DeviceLocation, GeolocationError>) {
        if !self.proximity.is_locating() {
            debug!("No location request outstanding, ignoring outcome");
            return;
        }
        self.observer.on_loading_changed(false);

        match self.proximity.finish(outcome) {
            Ok(fix) => {
                self.map.set_view(MapView {
                    center: fix.position,
                    zoom: self.config.located_zoom,
                });
                self.marker_overlay = Some(self.map.add_marker(fix.position));
                self.run_query(fix.position, self.proximity.radius_m());
            }
            Err(e) => self.fail_locate(e),
        }
    }

    fn fail_locate(&mut self, error: GeolocationError) {
        warn!("Proximity search unavailable: {}", error);
        self.handle_draw_event(DrawEvent::ProximityExited);
        self.map.set_view(self.config.fallback_view());
        self.results.clear();
        self.panel.reset();
        self.observer.on_geolocation_error();
    }

    /// Leave "near me" mode and give the map back to drawing
    pub fn exit_proximity(&mut self) {
        if self.proximity.device_location().is_none() {
            return;
        }

        info!("Leaving proximity mode");
        self.proximity.exit();
        if let Some(marker) = self.marker_overlay.take() {
            self.map.remove_overlay(marker);
        }
        self.clear_results();
        self.map.set_view(self.config.fallback_view());
        self.handle_draw_event(DrawEvent::ProximityExited);
    }

    fn apply(&mut self, effect: DrawEffect) {
        match effect {
            DrawEffect::ClearShape => {
                if let Some(overlay) = self.shape_overlay.take() {
                    self.map.remove_overlay(overlay);
                }
                self.clear_results();
            }
            DrawEffect::EnableDrawTool => self.map.set_draw_tool(true),
            DrawEffect::DisableDrawTool => self.map.set_draw_tool(false),
            DrawEffect::ShowShape(shape) => {
                if let Some(stale) = self.shape_overlay.take() {
                    self.map.remove_overlay(stale);
                }
                self.shape_overlay = Some(self.map.add_circle(&shape));
            }
            DrawEffect::RunQuery(shape) => self.run_query(shape.center, shape.radius_m),
        }
    }

    fn run_query(&mut self, center: LatLng, radius_m: f64) {
        self.results = find_within_radius(center, radius_m, &self.listings);
        info!(
            radius_m,
            matches = self.results.len(),
            candidates = self.listings.len(),
            "Spatial search finished"
        );
        self.panel.show_results(self.results.len());
        self.observer.on_properties_found(&self.results);
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.panel.reset();
        self.observer.on_properties_found(&[]);
    }
}
