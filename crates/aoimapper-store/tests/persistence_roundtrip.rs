//! Feature store persistence integration tests

use aoimapper_core::{EventBus, Feature, FeatureKind, FeatureStyle, LatLon};
use aoimapper_store::{MapState, MapStore, StatePersistence};
use std::sync::Arc;
use tempfile::TempDir;

fn polygon() -> Feature {
    Feature::new(
        FeatureKind::Polygon,
        vec![
            LatLon::new(51.96, 7.62),
            LatLon::new(51.97, 7.63),
            LatLon::new(51.95, 7.64),
        ],
        FeatureStyle::default_for(FeatureKind::Polygon),
    )
    .unwrap()
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");

    let (features, center) = {
        let mut store = MapStore::open(
            StatePersistence::new(&path),
            MapState::default(),
            Arc::new(EventBus::new()),
        );
        store.set_zoom(15);
        store.set_center(LatLon::new(40.0, -3.7));
        store.toggle_base_layer_visible();
        store.add_feature(Feature::point(LatLon::new(52.0, 7.0)));
        store.add_feature(polygon());
        (store.features().to_vec(), store.center())
    };

    let reopened = MapStore::open(
        StatePersistence::new(&path),
        MapState::default(),
        Arc::new(EventBus::new()),
    );
    assert_eq!(reopened.features(), features.as_slice());
    assert_eq!(reopened.center(), center);
    assert_eq!(reopened.zoom(), 15);
    assert!(!reopened.base_layer_visible());
}

#[test]
fn test_absent_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let persistence = StatePersistence::new(dir.path().join("nested").join("store.json"));

    assert!(persistence.load(&MapState::default()).unwrap().is_none());

    let store = MapStore::open(persistence, MapState::default(), Arc::new(EventBus::new()));
    assert_eq!(store.zoom(), 10);
    assert!(store.base_layer_visible());
    assert!(store.features().is_empty());
}

#[test]
fn test_corrupted_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");
    std::fs::write(&path, "{\"state\": {\"zoom\": ").unwrap();

    let defaults = MapState::with_viewport(LatLon::new(10.0, 20.0), 4);
    let store = MapStore::open(
        StatePersistence::new(&path),
        defaults.clone(),
        Arc::new(EventBus::new()),
    );
    assert_eq!(store.state(), &defaults);
}

#[test]
fn test_legacy_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");
    std::fs::write(
        &path,
        r##"{
            "state": {
                "zoom": 12,
                "center": [51.9607, 7.6261],
                "wmsLayerVisible": false,
                "features": [
                    {"id": "k2j4", "type": "line", "coordinates": [[1, 2], [3, 4]],
                     "properties": {"name": "Line", "color": "#0066cc"}}
                ],
                "activeDrawingMode": "polygon"
            },
            "version": 0
        }"##,
    )
    .unwrap();

    let store = MapStore::open(
        StatePersistence::new(&path),
        MapState::default(),
        Arc::new(EventBus::new()),
    );
    assert_eq!(store.zoom(), 12);
    assert!(!store.base_layer_visible());
    assert_eq!(store.features().len(), 1);
    assert_eq!(store.features()[0].kind(), FeatureKind::Line);
    assert_eq!(store.drawing_mode(), aoimapper_core::DrawingMode::None);
}

#[test]
fn test_every_mutation_is_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");
    let mut store = MapStore::open(
        StatePersistence::new(&path),
        MapState::default(),
        Arc::new(EventBus::new()),
    );

    store.add_feature(polygon());
    let on_disk = StatePersistence::new(&path)
        .load(&MapState::default())
        .unwrap()
        .unwrap();
    assert_eq!(on_disk.features.len(), 1);

    store.clear_all_features();
    let on_disk = StatePersistence::new(&path)
        .load(&MapState::default())
        .unwrap()
        .unwrap();
    assert!(on_disk.features.is_empty());
    assert!(!dir.path().join("map-store.json.tmp").exists());
}

#[test]
fn test_non_finite_center_never_reaches_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");

    {
        let mut store = MapStore::open(
            StatePersistence::new(&path),
            MapState::default(),
            Arc::new(EventBus::new()),
        );
        store.add_feature(Feature::point(LatLon::new(52.0, 7.0)));
        store.set_center(LatLon::new(40.0, -3.7));
        store.set_center(LatLon::new(f64::NAN, 7.0));
        store.set_center(LatLon::new(51.0, f64::INFINITY));
        assert_eq!(store.center(), LatLon::new(40.0, -3.7));
    }

    let reopened = MapStore::open(
        StatePersistence::new(&path),
        MapState::default(),
        Arc::new(EventBus::new()),
    );
    assert_eq!(reopened.features().len(), 1);
    assert_eq!(reopened.center(), LatLon::new(40.0, -3.7));
}

#[test]
fn test_null_center_keeps_features() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map-store.json");
    std::fs::write(
        &path,
        r#"{
            "state": {
                "zoom": 9,
                "center": [null, 7.0],
                "features": [{"id": "p1", "type": "point", "coordinates": [[52.0, 7.0]]}]
            },
            "version": 1
        }"#,
    )
    .unwrap();

    let defaults = MapState::with_viewport(LatLon::new(10.0, 20.0), 4);
    let store = MapStore::open(
        StatePersistence::new(&path),
        defaults,
        Arc::new(EventBus::new()),
    );
    assert_eq!(store.center(), LatLon::new(10.0, 20.0));
    assert_eq!(store.zoom(), 9);
    assert_eq!(store.features().len(), 1);
}
