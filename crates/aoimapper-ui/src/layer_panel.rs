//! Sidebar listing the imagery toggle and drawn features.

use aoimapper_core::{Feature, FeatureId, FeatureKind};
use aoimapper_store::MapStore;

pub const BASE_LAYER_LABEL: &str = "WMS Satellite Layer";
pub const EMPTY_TEXT: &str = "No features drawn yet";
pub const CLEAR_ALL_LABEL: &str = "Clear All";

/// The imagery toggle row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLayerRow {
    pub label: &'static str,
    pub visible: bool,
    /// Accessible description of what clicking does
    pub action: String,
}

/// One drawn feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub label: String,
    pub delete_action: String,
}

impl FeatureRow {
    fn from_feature(feature: &Feature) -> Self {
        let label = match feature.style.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} #{}", feature.kind(), feature.id().short(4)),
        };
        Self {
            id: feature.id().clone(),
            kind: feature.kind(),
            label,
            delete_action: format!("Delete {}", feature.kind()),
        }
    }
}

/// Everything the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPanelModel {
    pub base_layer: BaseLayerRow,
    pub header: String,
    pub rows: Vec<FeatureRow>,
    /// Shown instead of rows when there are none
    pub empty_text: Option<&'static str>,
    /// "Clear All" is only offered when there is something to clear
    pub clear_all: Option<&'static str>,
}

/// Layer panel actions and model building.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayerPanel;

impl LayerPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn model(&self, store: &MapStore) -> LayerPanelModel {
        let visible = store.base_layer_visible();
        let features = store.features();
        LayerPanelModel {
            base_layer: BaseLayerRow {
                label: BASE_LAYER_LABEL,
                visible,
                action: format!("{} WMS layer", if visible { "Hide" } else { "Show" }),
            },
            header: format!("Drawn Features ({})", features.len()),
            rows: features.iter().map(FeatureRow::from_feature).collect(),
            empty_text: features.is_empty().then_some(EMPTY_TEXT),
            clear_all: (!features.is_empty()).then_some(CLEAR_ALL_LABEL),
        }
    }

    pub fn toggle_base_layer(&self, store: &mut MapStore) {
        store.toggle_base_layer_visible();
    }

    pub fn delete(&self, store: &mut MapStore, id: &FeatureId) {
        store.remove_feature(id);
    }

    pub fn clear_all(&self, store: &mut MapStore) {
        store.clear_all_features();
    }
}
