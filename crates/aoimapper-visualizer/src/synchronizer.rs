//! Map/store synchronizer.
//!
//! Keeps a [`MapView`] consistent with the store:
//!
//! - map-originated pans and zooms are written to the store tagged
//!   [`ViewportOrigin::Map`], and such changes are never pushed back
//! - other viewport changes are applied to the map unless it already shows
//!   them
//! - every feature list or session change triggers a total overlay redraw
//! - the imagery layer follows the store's visibility flag

use crate::layers::{BaseTileLayer, ImageryLayer};
use crate::map_view::MapView;
use crate::overlay::render_overlay;
use aoimapper_core::{
    AppEvent, EventBus, EventCategory, EventFilter, Feature, LatLon, MapEvent, SessionEvent,
    StoreEvent, SubscriptionId, Viewport, ViewportOrigin,
};
use aoimapper_store::{MapState, MapStore};
use parking_lot::Mutex;
use std::sync::Arc;

struct Shared<M> {
    view: M,
    base_layer: BaseTileLayer,
    imagery: ImageryLayer,
    imagery_attached: bool,
    features: Vec<Feature>,
    session: Vec<LatLon>,
}

impl<M: MapView> Shared<M> {
    fn apply(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Store(StoreEvent::ViewportChanged { viewport, origin }) => {
                self.apply_viewport(*viewport, *origin)
            }
            AppEvent::Store(StoreEvent::BaseLayerVisibilityChanged { visible }) => {
                self.set_imagery_visible(*visible)
            }
            AppEvent::Store(StoreEvent::FeaturesChanged { features }) => {
                self.features = features.clone();
                self.redraw();
            }
            AppEvent::Session(SessionEvent::Updated { vertices, .. }) => {
                self.session = vertices.clone();
                self.redraw();
            }
            AppEvent::Session(SessionEvent::Cleared) => {
                self.session.clear();
                self.redraw();
            }
            // The router answers mode changes with a session event.
            AppEvent::Store(StoreEvent::DrawingModeChanged { .. }) | AppEvent::Map(_) => {}
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport, origin: ViewportOrigin) {
        if origin == ViewportOrigin::Map {
            return;
        }
        if self.view.current_view() == viewport {
            tracing::trace!("Map already shows {}", viewport);
            return;
        }
        tracing::debug!("Recentring map to {} ({:?})", viewport, origin);
        self.view.set_view(viewport);
    }

    fn set_imagery_visible(&mut self, visible: bool) {
        if visible == self.imagery_attached {
            return;
        }
        if visible {
            self.view.attach_imagery(&self.imagery);
        } else {
            self.view.detach_imagery();
        }
        self.imagery_attached = visible;
        tracing::debug!("Imagery layer {}", if visible { "attached" } else { "detached" });
    }

    fn redraw(&mut self) {
        let drawables = render_overlay(&self.features, &self.session);
        tracing::trace!("Redrawing {} overlay primitives", drawables.len());
        self.view.replace_overlays(drawables);
    }
}

/// Two-way binding between a map view and the store.
pub struct Synchronizer<M: MapView> {
    bus: Arc<EventBus>,
    shared: Arc<Mutex<Shared<M>>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl<M: MapView> Synchronizer<M> {
    /// Synchronizer with the default OSM base map and NRW imagery.
    pub fn new(view: M, bus: Arc<EventBus>) -> Self {
        Self::with_layers(view, BaseTileLayer::default(), ImageryLayer::default(), bus)
    }

    pub fn with_layers(
        view: M,
        base_layer: BaseTileLayer,
        imagery: ImageryLayer,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            bus,
            shared: Arc::new(Mutex::new(Shared {
                view,
                base_layer,
                imagery,
                imagery_attached: false,
                features: Vec::new(),
                session: Vec::new(),
            })),
            subscription: Mutex::new(None),
        }
    }

    /// Initial map setup from a store snapshot, then start following store
    /// and session events. Mounting twice is a no-op.
    pub fn mount(&self, state: &MapState) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            tracing::debug!("Map already mounted");
            return;
        }

        {
            let mut shared = self.shared.lock();
            shared.view.set_view(state.viewport);
            let base_layer = shared.base_layer.clone();
            shared.view.add_base_layer(&base_layer);
            shared.set_imagery_visible(state.base_layer_visible);
            shared.features = state.features.clone();
            shared.session.clear();
            shared.redraw();
        }

        let shared = Arc::clone(&self.shared);
        let id = self.bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Store, EventCategory::Session]),
            move |event| shared.lock().apply(event),
        );
        *subscription = Some(id);
        drop(subscription);

        tracing::info!(
            "Map mounted at {} with {} features",
            state.viewport,
            state.features.len()
        );
        let _ = self.bus.publish(AppEvent::Map(MapEvent::Mounted));
    }

    /// Stop following the store and remove every overlay primitive and the
    /// imagery layer.
    pub fn unmount(&self) {
        let Some(id) = self.subscription.lock().take() else {
            return;
        };
        self.bus.unsubscribe(id);

        {
            let mut shared = self.shared.lock();
            shared.view.clear_overlays();
            shared.set_imagery_visible(false);
            shared.features.clear();
            shared.session.clear();
        }

        tracing::info!("Map unmounted");
        let _ = self.bus.publish(AppEvent::Map(MapEvent::Unmounted));
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// The map reported a zoom level change.
    pub fn map_zoomed(&self, store: &mut MapStore, zoom: i32) {
        store.set_zoom_from(zoom, ViewportOrigin::Map);
    }

    /// The map finished a pan.
    pub fn map_moved(&self, store: &mut MapStore, center: LatLon) {
        store.set_center_from(center, ViewportOrigin::Map);
    }

    /// Report whatever the map currently shows to the store.
    pub fn map_viewport_changed(&self, store: &mut MapStore) {
        let viewport = self.shared.lock().view.current_view();
        self.map_zoomed(store, i32::from(viewport.zoom));
        self.map_moved(store, viewport.center);
    }

    /// Read access to the underlying view.
    pub fn with_view<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.shared.lock().view)
    }

    /// Mutable access to the underlying view, for simulating user
    /// interaction. Must not touch the store.
    pub fn with_view_mut<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.shared.lock().view)
    }
}

impl<M: MapView> Drop for Synchronizer<M> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.lock().take() {
            self.bus.unsubscribe(id);
        }
    }
}

impl<M: MapView> std::fmt::Debug for Synchronizer<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("Synchronizer")
            .field("mounted", &self.is_mounted())
            .field("imagery_attached", &shared.imagery_attached)
            .field("features", &shared.features.len())
            .field("session", &shared.session.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_view::RecordingMapView;
    use aoimapper_core::{DrawingMode, FeatureKind, FeatureStyle};

    fn mounted() -> (MapStore, Synchronizer<RecordingMapView>) {
        let bus = Arc::new(EventBus::new());
        let store = MapStore::new(bus.clone());
        let sync = Synchronizer::new(RecordingMapView::new(), bus);
        sync.mount(store.state());
        (store, sync)
    }

    #[test]
    fn test_mount_applies_initial_state() {
        let (store, sync) = mounted();
        sync.with_view(|view| {
            assert_eq!(view.viewport(), store.viewport());
            assert!(view.base_layer().is_some());
            assert!(view.imagery_attached());
            assert_eq!(view.redraw_count(), 1);
            assert!(view.overlays().is_empty());
        });
        assert!(sync.is_mounted());
    }

    #[test]
    fn test_ui_zoom_recentres_map() {
        let (mut store, sync) = mounted();
        let before = sync.with_view(|v| v.recenter_count());
        store.set_zoom(12);
        sync.with_view(|view| {
            assert_eq!(view.viewport().zoom, 12);
            assert_eq!(view.recenter_count(), before + 1);
        });
    }

    #[test]
    fn test_map_pan_does_not_bounce_back() {
        let (mut store, sync) = mounted();
        let target = Viewport::new(LatLon::new(50.0, 8.0), 13);
        sync.with_view_mut(|view| view.user_moved_to(target));
        let before = sync.with_view(|v| v.recenter_count());

        sync.map_viewport_changed(&mut store);

        assert_eq!(store.viewport(), target);
        assert_eq!(sync.with_view(|v| v.recenter_count()), before);
    }

    #[test]
    fn test_search_recentre_skipped_when_already_there() {
        let (mut store, sync) = mounted();
        let target = Viewport::new(LatLon::new(48.0, 11.0), i32::from(store.zoom()));
        sync.with_view_mut(|view| view.user_moved_to(target));
        let before = sync.with_view(|v| v.recenter_count());

        store.set_center_from(target.center, ViewportOrigin::Search);

        assert_eq!(store.viewport(), target);
        assert_eq!(sync.with_view(|v| v.recenter_count()), before);
    }

    #[test]
    fn test_imagery_follows_visibility() {
        let (mut store, sync) = mounted();
        store.toggle_base_layer_visible();
        assert!(!sync.with_view(|v| v.imagery_attached()));
        store.toggle_base_layer_visible();
        assert!(sync.with_view(|v| v.imagery_attached()));
    }

    #[test]
    fn test_feature_changes_redraw_everything() {
        let (mut store, sync) = mounted();
        store.add_feature(Feature::point(LatLon::new(1.0, 1.0)));
        store.add_feature(
            Feature::new(
                FeatureKind::Line,
                vec![LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)],
                FeatureStyle::default_for(FeatureKind::Line),
            )
            .unwrap(),
        );
        sync.with_view(|view| {
            assert_eq!(view.redraw_count(), 3);
            assert_eq!(view.overlays().len(), 2);
        });

        store.clear_all_features();
        sync.with_view(|view| assert!(view.overlays().is_empty()));
    }

    #[test]
    fn test_session_events_redraw_feedback() {
        let (store, sync) = mounted();
        let vertices = vec![LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)];
        let _ = store.bus().publish(AppEvent::Session(SessionEvent::Updated {
            mode: DrawingMode::Line,
            vertices,
        }));
        assert_eq!(sync.with_view(|v| v.session_overlays().count()), 3);

        let _ = store.bus().publish(AppEvent::Session(SessionEvent::Cleared));
        assert_eq!(sync.with_view(|v| v.session_overlays().count()), 0);
    }

    #[test]
    fn test_unmount_tears_down() {
        let (mut store, sync) = mounted();
        store.add_feature(Feature::point(LatLon::new(1.0, 1.0)));
        sync.unmount();

        sync.with_view(|view| {
            assert!(view.overlays().is_empty());
            assert!(!view.imagery_attached());
        });
        assert!(!sync.is_mounted());

        let redraws = sync.with_view(|v| v.redraw_count());
        store.add_feature(Feature::point(LatLon::new(2.0, 2.0)));
        assert_eq!(sync.with_view(|v| v.redraw_count()), redraws);
    }

    #[test]
    fn test_mount_twice_is_noop() {
        let (store, sync) = mounted();
        sync.mount(store.state());
        assert_eq!(store.bus().subscriber_count(), 1);
        assert_eq!(sync.with_view(|v| v.redraw_count()), 1);
    }
}
