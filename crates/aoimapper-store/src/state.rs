//! Plain store state.

use aoimapper_core::{DrawingMode, Feature, FeatureId, LatLon, Viewport};

/// Everything the feature store owns.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub viewport: Viewport,
    /// Whether the imagery overlay is attached to the map.
    pub base_layer_visible: bool,
    /// Committed features in insertion (display) order.
    pub features: Vec<Feature>,
    /// Active drawing tool. Never persisted.
    pub drawing_mode: DrawingMode,
}

impl MapState {
    /// Default state centred on `center` at `zoom`.
    pub fn with_viewport(center: LatLon, zoom: i32) -> Self {
        Self {
            viewport: Viewport::new(center, zoom),
            ..Self::default()
        }
    }

    pub fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == id)
    }

    pub(crate) fn position(&self, id: &FeatureId) -> Option<usize> {
        self.features.iter().position(|f| f.id() == id)
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            base_layer_visible: true,
            features: Vec::new(),
            drawing_mode: DrawingMode::None,
        }
    }
}
