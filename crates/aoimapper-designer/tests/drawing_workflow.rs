//! End-to-end drawing workflows through the router and store.

use aoimapper_core::{AppEvent, DrawingMode, EventBus, EventFilter, FeatureKind, LatLon, StoreEvent};
use aoimapper_designer::{PointerEvent, PointerOutcome, PointerRouter};
use aoimapper_store::MapStore;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn setup() -> (MapStore, PointerRouter) {
    let bus = Arc::new(EventBus::new());
    let router = PointerRouter::new(bus.clone());
    router.attach();
    (MapStore::new(bus), router)
}

#[test]
fn test_mixed_session_keeps_insertion_order() {
    let (mut store, router) = setup();

    store.set_drawing_mode(DrawingMode::Point);
    router.handle(&mut store, PointerEvent::Primary(LatLon::new(1.0, 1.0)));

    store.set_drawing_mode(DrawingMode::Line);
    router.handle(&mut store, PointerEvent::Primary(LatLon::new(2.0, 2.0)));
    router.handle(&mut store, PointerEvent::Primary(LatLon::new(3.0, 3.0)));
    router.handle(&mut store, PointerEvent::Secondary(LatLon::new(3.0, 3.0)));

    store.set_drawing_mode(DrawingMode::Polygon);
    for at in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
        router.handle(&mut store, PointerEvent::Primary(at.into()));
    }
    router.handle(&mut store, PointerEvent::Secondary(LatLon::new(0.0, 0.0)));

    let kinds: Vec<FeatureKind> = store.features().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![FeatureKind::Point, FeatureKind::Line, FeatureKind::Polygon]
    );
}

#[test]
fn test_each_commit_publishes_one_features_change() {
    let bus = Arc::new(EventBus::new());
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let AppEvent::Store(StoreEvent::FeaturesChanged { .. }) = event {
            *sink.lock().unwrap() += 1;
        }
    });
    let router = PointerRouter::new(bus.clone());
    router.attach();
    let mut store = MapStore::new(bus);

    store.set_drawing_mode(DrawingMode::Point);
    for i in 0..5 {
        router.handle(
            &mut store,
            PointerEvent::Primary(LatLon::new(i as f64, i as f64)),
        );
    }

    assert_eq!(*count.lock().unwrap(), 5);
    assert_eq!(store.features().len(), 5);
}

proptest! {
    #[test]
    fn prop_finalized_geometry_matches_clicks(
        clicks in prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 0..12),
        polygon in any::<bool>(),
    ) {
        let (mut store, router) = setup();
        let mode = if polygon { DrawingMode::Polygon } else { DrawingMode::Line };
        let kind = if polygon { FeatureKind::Polygon } else { FeatureKind::Line };
        store.set_drawing_mode(mode);

        for &(lat, lon) in &clicks {
            router.handle(&mut store, PointerEvent::Primary(LatLon::new(lat, lon)));
        }
        let outcome = router.handle(&mut store, PointerEvent::Secondary(LatLon::new(0.0, 0.0)));
        prop_assert!(router.pending_vertices().is_empty());

        let expected: Vec<LatLon> = clicks.iter().map(|&(lat, lon)| LatLon::new(lat, lon)).collect();
        if clicks.len() >= kind.min_vertices() {
            prop_assert!(matches!(outcome, PointerOutcome::Committed(_)), "outcome was {:?}", outcome);
            prop_assert_eq!(store.features().len(), 1);
            prop_assert_eq!(store.features()[0].vertices(), expected.as_slice());
        } else {
            prop_assert!(store.features().is_empty());
        }
    }
}

#[test]
fn test_session_not_carried_across_mode_round_trip() {
    let (mut store, router) = setup();

    store.set_drawing_mode(DrawingMode::Line);
    router.handle(&mut store, PointerEvent::Primary(LatLon::new(0.0, 0.0)));
    router.handle(&mut store, PointerEvent::Primary(LatLon::new(1.0, 1.0)));
    store.set_drawing_mode(DrawingMode::Point);
    store.set_drawing_mode(DrawingMode::Line);

    let outcome = router.handle(&mut store, PointerEvent::Secondary(LatLon::new(1.0, 1.0)));

    assert_eq!(outcome, PointerOutcome::Ignored);
    assert!(store.features().is_empty());
}
