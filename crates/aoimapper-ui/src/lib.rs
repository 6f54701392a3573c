//! # AOI Mapper UI
//!
//! Toolkit-independent view models for the panels around the map. Each
//! model reads from and writes to the [`MapStore`](aoimapper_store::MapStore)
//! and exposes display-ready labels, so a front end only has to paint them.

pub mod controls;
pub mod layer_panel;
pub mod search_bar;
pub mod toolbar;

pub use controls::MapControls;
pub use layer_panel::{BaseLayerRow, FeatureRow, LayerPanel, LayerPanelModel};
pub use search_bar::{SearchBar, SearchResultRow};
pub use toolbar::{DrawingToolbar, ToolButton, TOOLS};
