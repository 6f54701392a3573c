//! End-to-end scenarios through the assembled application.

use aoimapper::{
    default_state, execute, App, Command, Config, DrawingMode, EventBus, FeatureKind, LatLon,
    MapStore, RecordingMapView, StatePersistence, Viewport,
};
use aoimapper_geocoding::{Geocoder, GeocodingResult};
use std::sync::Arc;
use tempfile::TempDir;

struct FixedGeocoder;

impl Geocoder for FixedGeocoder {
    fn search(&self, _query: &str) -> Vec<GeocodingResult> {
        vec![GeocodingResult {
            lat: 48.1372,
            lon: 11.5756,
            display_name: "München, Bayern, Deutschland".to_string(),
            boundingbox: None,
        }]
    }

    fn reverse(&self, _at: LatLon) -> Option<GeocodingResult> {
        None
    }
}

fn app_with_store(store: MapStore) -> App<RecordingMapView> {
    let app = App::new(
        store,
        RecordingMapView::new(),
        &Config::default(),
        Arc::new(FixedGeocoder),
    );
    app.mount();
    app
}

fn memory_app() -> App<RecordingMapView> {
    let bus = Arc::new(EventBus::new());
    app_with_store(MapStore::with_state(default_state(&Config::default()), bus))
}

fn persistent_app(dir: &TempDir) -> App<RecordingMapView> {
    let bus = Arc::new(EventBus::new());
    let persistence = StatePersistence::new(dir.path().join("map-store.json"));
    app_with_store(MapStore::open(
        persistence,
        default_state(&Config::default()),
        bus,
    ))
}

fn run(app: &mut App<RecordingMapView>, line: &str) -> String {
    let command: Command = line.parse().expect("valid command");
    execute(app, command)
}

#[test]
fn test_point_click_scenario() {
    let mut app = memory_app();
    run(&mut app, "mode point");
    let out = run(&mut app, "click 52.0 7.0");
    assert!(out.starts_with("added "));

    let features = app.store().features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].kind(), FeatureKind::Point);
    assert_eq!(features[0].vertices(), &[LatLon::new(52.0, 7.0)]);
    assert_eq!(features[0].style.color.as_deref(), Some("#0066cc"));
    assert_eq!(
        app.synchronizer().with_view(|v| v.feature_overlays().count()),
        1
    );
}

#[test]
fn test_polygon_scenario_through_shell() {
    let mut app = memory_app();
    run(&mut app, "tool polygon");
    assert!(app.tool_active(DrawingMode::Polygon));
    assert_eq!(run(&mut app, "click 0 0"), "1 pending vertices");
    run(&mut app, "click 1 0");
    run(&mut app, "click 0 1");
    assert!(run(&mut app, "context 9 9").starts_with("added "));

    let list = run(&mut app, "list");
    assert!(list.starts_with("Drawn Features (1)"));
    assert!(list.contains("Area of Interest [polygon]"));

    // Toggling the active tool switches drawing off.
    run(&mut app, "tool polygon");
    assert_eq!(app.store().drawing_mode(), DrawingMode::None);
}

#[test]
fn test_short_line_is_discarded() {
    let mut app = memory_app();
    run(&mut app, "mode line");
    run(&mut app, "click 3 3");
    assert_eq!(run(&mut app, "context"), "discarded 1 pending vertices");
    assert!(app.store().features().is_empty());
    assert!(app.router().pending_vertices().is_empty());
    assert_eq!(
        app.synchronizer().with_view(|v| v.overlays().len()),
        0
    );
}

#[test]
fn test_zoom_controls_clamp() {
    let mut app = memory_app();
    assert_eq!(run(&mut app, "zoom 25"), "zoom 19");
    assert_eq!(run(&mut app, "zoom-in"), "zoom 19");
    assert_eq!(run(&mut app, "zoom -3"), "zoom 0");
    assert_eq!(run(&mut app, "zoom-out"), "zoom 0");
    assert_eq!(app.synchronizer().with_view(|v| v.viewport().zoom), 0);
}

#[test]
fn test_pan_updates_store_without_recentre() {
    let mut app = memory_app();
    let recenters = app.synchronizer().with_view(|v| v.recenter_count());
    run(&mut app, "pan 50.5 8.25 13");
    assert_eq!(
        app.store().viewport(),
        Viewport::new(LatLon::new(50.5, 8.25), 13)
    );
    assert_eq!(
        app.synchronizer().with_view(|v| v.recenter_count()),
        recenters
    );
}

#[test]
fn test_search_and_select_recentres_map() {
    let mut app = memory_app();
    let out = run(&mut app, "search münchen");
    assert!(out.contains("1. München (München, Bayern, Deutschland)"));

    assert_eq!(run(&mut app, "select 2"), "no result 2");
    run(&mut app, "select 1");
    assert_eq!(app.store().center(), LatLon::new(48.1372, 11.5756));
    assert_eq!(
        app.synchronizer().with_view(|v| v.viewport().center),
        LatLon::new(48.1372, 11.5756)
    );
    assert!(app.search().query().is_empty());
}

#[test]
fn test_layer_toggle_and_delete() {
    let mut app = memory_app();
    assert_eq!(run(&mut app, "layer"), "WMS Satellite Layer: hidden");
    assert!(!app.synchronizer().with_view(|v| v.imagery_attached()));

    run(&mut app, "mode point");
    run(&mut app, "click 1 1");
    run(&mut app, "click 2 2");
    assert!(run(&mut app, "delete 1").starts_with("deleted "));
    assert_eq!(run(&mut app, "delete 5"), "no feature '5'");
    assert_eq!(app.store().features().len(), 1);

    run(&mut app, "clear");
    assert!(run(&mut app, "list").contains("No features drawn yet"));
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = persistent_app(&dir);
        run(&mut app, "mode line");
        run(&mut app, "click 0 0");
        run(&mut app, "click 1 1");
        run(&mut app, "context");
        run(&mut app, "zoom 14");
        run(&mut app, "layer");
        app.unmount();
    }

    let app = persistent_app(&dir);
    let store = app.store();
    assert_eq!(store.features().len(), 1);
    assert_eq!(store.features()[0].kind(), FeatureKind::Line);
    assert_eq!(store.zoom(), 14);
    assert!(!store.base_layer_visible());
    assert_eq!(store.drawing_mode(), DrawingMode::None);

    app.synchronizer().with_view(|view| {
        assert_eq!(view.viewport().zoom, 14);
        assert!(!view.imagery_attached());
        assert_eq!(view.feature_overlays().count(), 1);
    });
}
