use housing_radar::location::{FixedLocationProvider, UnsupportedLocationProvider};
use housing_radar::map::{HeadlessMap, MapSurface};
use housing_radar::models::{LatLng, Listing, SearchShape};
use housing_radar::search::DrawState;
use housing_radar::{GeolocationError, RecordingObserver, SearchConfig, SearchPage};

fn listing(id: i64, lat: f64, lng: f64) -> Listing {
    Listing {
        id,
        title: format!("Imóvel {id}"),
        address: format!("Rua {id}, Salvador"),
        thumbnail: Some(format!("thumbs/{id}.jpg")),
        latitude: lat,
        longitude: lng,
    }
}

fn new_page(listings: Vec<Listing>) -> SearchPage<HeadlessMap, RecordingObserver> {
    let config = SearchConfig::default();
    let map = HeadlessMap::new(config.fallback_view());
    SearchPage::new(config, listings, map, RecordingObserver::default())
}

#[tokio::test]
async fn proximity_search_hit() {
    let mut page = new_page(vec![
        listing(1, -12.9800, -38.5010),
        listing(2, -13.5000, -39.0000),
    ]);
    let provider = FixedLocationProvider::at(LatLng::new(-12.9777, -38.5016));

    page.locate(&provider).await;

    let results = page.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].listing.id, 1);
    assert!((results[0].distance - 260.0).abs() < 15.0, "got {}", results[0].distance);
    assert!(page.is_panel_open());
    assert_eq!(page.map().view().center, LatLng::new(-12.9777, -38.5016));
    assert_eq!(page.observer().last_found().map(|m| m.len()), Some(1));
}

#[test]
fn draw_then_clear() {
    let mut page = new_page(vec![
        listing(1, -12.9777, -38.5016),
        listing(2, -12.9790, -38.5020),
        listing(3, -12.9760, -38.5000),
        listing(4, -12.9000, -38.4000),
    ]);

    page.request_draw();
    assert_eq!(page.draw_state(), DrawState::Drawing);
    page.shape_created(SearchShape::circle(LatLng::new(-12.9777, -38.5016), 1_000.0));
    page.drawing_stopped();

    assert_eq!(page.draw_state(), DrawState::Drawn);
    assert_eq!(page.match_count(), 3);
    assert!(page.is_panel_open());
    assert_eq!(page.map().circle_count(), 1);

    page.clear_drawing();

    assert_eq!(page.draw_state(), DrawState::Idle);
    assert!(page.results().is_empty());
    assert!(!page.is_panel_open());
    assert_eq!(page.map().circle_count(), 0);
    assert_eq!(page.observer().last_found().map(|m| m.len()), Some(0));
}

#[test]
fn cancelled_draw_runs_no_query() {
    let mut page = new_page(vec![listing(1, -12.9777, -38.5016)]);

    page.request_draw();
    page.cancel_drawing();

    assert_eq!(page.draw_state(), DrawState::Idle);
    assert!(page.search_shape().is_none());
    assert!(page.observer().found.is_empty());
    assert_eq!(page.map().circle_count(), 0);
    assert!(!page.map().draw_tool_enabled());
}

#[test]
fn tool_stopping_without_shape_is_a_cancel() {
    let mut page = new_page(vec![listing(1, -12.9777, -38.5016)]);

    page.request_draw();
    page.drawing_stopped();

    assert_eq!(page.draw_state(), DrawState::Idle);
    assert!(page.observer().found.is_empty());
}

#[tokio::test]
async fn geolocation_denied() {
    let mut page = new_page(vec![listing(1, -12.9777, -38.5016)]);
    let provider = FixedLocationProvider::failing(GeolocationError::Denied);

    page.locate(&provider).await;

    assert_eq!(page.observer().geolocation_errors, 1);
    assert_eq!(provider.request_count(), 1);
    assert_eq!(page.map().view(), SearchConfig::default().fallback_view());
    assert!(page.results().is_empty());
    assert!(page.device_location().is_none());
    assert!(page.controls().draw_enabled);
}

#[tokio::test]
async fn unsupported_platform_reports_error_without_request() {
    let mut page = new_page(vec![]);

    page.locate(&UnsupportedLocationProvider).await;

    assert_eq!(page.observer().geolocation_errors, 1);
    assert!(page.results().is_empty());
}

#[tokio::test]
async fn device_location_blocks_drawing() {
    let mut page = new_page(vec![listing(1, -12.9800, -38.5010)]);
    page.request_draw();
    page.shape_created(SearchShape::circle(LatLng::new(-12.9777, -38.5016), 2_000.0));
    assert_eq!(page.map().circle_count(), 1);

    page.locate(&FixedLocationProvider::at(LatLng::new(-12.9777, -38.5016))).await;
    assert_eq!(page.draw_state(), DrawState::Idle);
    assert_eq!(page.map().circle_count(), 0);
    assert!(!page.controls().draw_enabled);

    page.request_draw();
    assert_eq!(page.draw_state(), DrawState::Idle);
    assert!(!page.map().draw_tool_enabled());

    page.exit_proximity();
    page.request_draw();
    assert_eq!(page.draw_state(), DrawState::Drawing);
}

#[test]
fn circle_boundary_matches_reference_distance() {
    // Along a meridian the great-circle distance is R * dlat (R = 6 371 000 m),
    // so one degree of latitude is 111 194.93 m.
    const METERS_PER_DEGREE: f64 = 111_194.93;
    let center = LatLng::new(-12.9777, -38.5016);
    let inside = listing(1, center.lat + 0.0224, center.lng);
    let outside = listing(2, center.lat + 0.0226, center.lng);
    let mut page = new_page(vec![outside.clone(), inside]);

    page.request_draw();
    page.shape_created(SearchShape::circle(center, 2_500.0));

    let results = page.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].listing.id, 1);
    let expected = 0.0224 * METERS_PER_DEGREE;
    assert!((results[0].distance - expected).abs() < 1.0, "got {}", results[0].distance);
    assert!((page.map().distance(center, outside.position()) - 0.0226 * METERS_PER_DEGREE).abs() < 1.0);
}

#[test]
fn query_agrees_with_map_distance() {
    let center = LatLng::new(-12.9777, -38.5016);
    let listings: Vec<Listing> = (0..25)
        .map(|i| listing(i, -12.9777 + (i as f64) * 0.0015, -38.5016 + (i as f64) * 0.0007))
        .collect();
    let mut page = new_page(listings.clone());

    page.request_draw();
    page.shape_created(SearchShape::circle(center, 2_500.0));

    for l in &listings {
        let inside = page.map().distance(center, l.position()) <= 2_500.0;
        let found = page.results().iter().any(|m| m.listing.id == l.id);
        assert_eq!(inside, found, "listing {}", l.id);
    }
    for pair in page.results().windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}
