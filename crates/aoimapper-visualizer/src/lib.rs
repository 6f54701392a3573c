//! # AOI Mapper Visualizer
//!
//! Everything between the feature store and the live map widget:
//!
//! - [`overlay`]: turns features and the pending drawing session into
//!   drawable primitives
//! - [`layers`]: descriptors for the base tile map and the imagery overlay
//! - [`map_view`]: the [`MapView`] seam a host map widget implements, plus a
//!   headless recorder
//! - [`synchronizer`]: keeps the map view and the store consistent in both
//!   directions

pub mod layers;
pub mod map_view;
pub mod overlay;
pub mod synchronizer;

pub use layers::{BaseTileLayer, ImageryLayer};
pub use map_view::{MapView, RecordingMapView};
pub use overlay::{
    render_feature, render_features, render_overlay, render_session, Drawable, PathStyle, Shape,
    SESSION_PATH_COLOR, SESSION_VERTEX_COLOR,
};
pub use synchronizer::Synchronizer;
