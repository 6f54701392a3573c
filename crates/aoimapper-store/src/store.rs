//! The feature store.
//!
//! Single writer for viewport and feature state. Every effective mutation
//! is persisted (when a backing file is configured) and then published on
//! the event bus as a [`StoreEvent`] before the call returns.

use crate::persistence::StatePersistence;
use crate::state::MapState;
use aoimapper_core::{
    clamp_zoom, AppEvent, DrawingMode, EventBus, Feature, FeatureId, FeaturePatch, LatLon,
    StoreEvent, Viewport, ViewportOrigin,
};
use std::sync::Arc;

/// Process-wide map state with controlled mutation.
pub struct MapStore {
    state: MapState,
    bus: Arc<EventBus>,
    persistence: Option<StatePersistence>,
    mode_changes: u64,
}

impl MapStore {
    /// In-memory store with default state.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::with_state(MapState::default(), bus)
    }

    /// In-memory store starting from `state`.
    pub fn with_state(state: MapState, bus: Arc<EventBus>) -> Self {
        Self {
            state,
            bus,
            persistence: None,
            mode_changes: 0,
        }
    }

    /// Store backed by `persistence`, loading whatever was saved before and
    /// falling back to `defaults`.
    pub fn open(persistence: StatePersistence, defaults: MapState, bus: Arc<EventBus>) -> Self {
        let state = persistence.load_or_default(&defaults);
        Self {
            state,
            bus,
            persistence: Some(persistence),
            mode_changes: 0,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn zoom(&self) -> u8 {
        self.state.viewport.zoom
    }

    pub fn center(&self) -> LatLon {
        self.state.viewport.center
    }

    pub fn base_layer_visible(&self) -> bool {
        self.state.base_layer_visible
    }

    pub fn features(&self) -> &[Feature] {
        &self.state.features
    }

    pub fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.state.feature(id)
    }

    pub fn drawing_mode(&self) -> DrawingMode {
        self.state.drawing_mode
    }

    /// Set the zoom from a UI control. Clamped to `[0, 19]`.
    pub fn set_zoom(&mut self, zoom: i32) {
        self.set_zoom_from(zoom, ViewportOrigin::Ui);
    }

    /// Set the zoom, tagging where the request came from.
    pub fn set_zoom_from(&mut self, zoom: i32, origin: ViewportOrigin) {
        let zoom = clamp_zoom(zoom);
        if zoom == self.state.viewport.zoom {
            return;
        }
        self.state.viewport.zoom = zoom;
        tracing::debug!("Zoom set to {} ({:?})", zoom, origin);
        self.viewport_changed(origin);
    }

    /// Set the centre from a UI control.
    pub fn set_center(&mut self, center: LatLon) {
        self.set_center_from(center, ViewportOrigin::Ui);
    }

    /// Set the centre, tagging where the request came from.
    /// Non-finite coordinates are ignored.
    pub fn set_center_from(&mut self, center: LatLon, origin: ViewportOrigin) {
        if !center.is_finite() {
            tracing::warn!("Ignoring non-finite centre {} ({:?})", center, origin);
            return;
        }
        if center == self.state.viewport.center {
            return;
        }
        self.state.viewport.center = center;
        tracing::debug!("Center set to {} ({:?})", center, origin);
        self.viewport_changed(origin);
    }

    /// Flip whether the imagery overlay is attached.
    pub fn toggle_base_layer_visible(&mut self) {
        self.state.base_layer_visible = !self.state.base_layer_visible;
        tracing::info!(
            "Imagery overlay {}",
            if self.state.base_layer_visible {
                "shown"
            } else {
                "hidden"
            }
        );
        self.persist();
        self.publish(StoreEvent::BaseLayerVisibilityChanged {
            visible: self.state.base_layer_visible,
        });
    }

    /// Append a feature. The feature type already guarantees the
    /// vertex-count rule, so nothing is re-validated here.
    pub fn add_feature(&mut self, feature: Feature) {
        tracing::info!(
            "Added {} feature {} with {} vertices",
            feature.kind(),
            feature.id(),
            feature.vertices().len()
        );
        self.state.features.push(feature);
        self.features_changed();
    }

    /// Remove the feature with `id`. Returns false (and changes nothing) if
    /// no such feature exists.
    pub fn remove_feature(&mut self, id: &FeatureId) -> bool {
        let Some(index) = self.state.position(id) else {
            tracing::debug!("Remove ignored, no feature {}", id);
            return false;
        };
        self.state.features.remove(index);
        tracing::info!("Removed feature {}", id);
        self.features_changed();
        true
    }

    /// Merge `patch` into the feature with `id`. Returns false if the feature
    /// does not exist or the patch changed nothing.
    pub fn update_feature(&mut self, id: &FeatureId, patch: FeaturePatch) -> bool {
        let Some(index) = self.state.position(id) else {
            tracing::debug!("Update ignored, no feature {}", id);
            return false;
        };
        if !self.state.features[index].apply(patch) {
            return false;
        }
        tracing::info!("Updated feature {}", id);
        self.features_changed();
        true
    }

    /// Empty the feature list.
    pub fn clear_all_features(&mut self) {
        if self.state.features.is_empty() {
            return;
        }
        tracing::info!("Cleared {} features", self.state.features.len());
        self.state.features.clear();
        self.features_changed();
    }

    /// Number of effective drawing mode changes since this store was
    /// created. Lets a reader detect switches it did not observe.
    pub fn mode_changes(&self) -> u64 {
        self.mode_changes
    }

    /// Replace the active drawing mode. The pending drawing session is not
    /// touched here; the pointer router reacts to the published change.
    pub fn set_drawing_mode(&mut self, mode: DrawingMode) {
        let previous = self.state.drawing_mode;
        if previous == mode {
            return;
        }
        self.state.drawing_mode = mode;
        self.mode_changes += 1;
        tracing::debug!("Drawing mode {} -> {}", previous, mode);
        self.publish(StoreEvent::DrawingModeChanged {
            previous,
            current: mode,
        });
    }

    fn viewport_changed(&mut self, origin: ViewportOrigin) {
        self.persist();
        self.publish(StoreEvent::ViewportChanged {
            viewport: self.state.viewport,
            origin,
        });
    }

    fn features_changed(&mut self) {
        self.persist();
        self.publish(StoreEvent::FeaturesChanged {
            features: self.state.features.clone(),
        });
    }

    fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(&self.state) {
                tracing::warn!("Failed to persist store: {}", e);
            }
        }
    }

    fn publish(&self, event: StoreEvent) {
        // Nobody listening is fine; the store works without a map attached.
        let _ = self.bus.publish(AppEvent::Store(event));
    }
}

impl std::fmt::Debug for MapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapStore")
            .field("viewport", &self.state.viewport)
            .field("features", &self.state.features.len())
            .field("drawing_mode", &self.state.drawing_mode)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}
