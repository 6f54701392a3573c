//! # AOI Mapper Core
//!
//! Core types shared by every AOI Mapper crate.
//! Provides the geographic primitives, the committed feature model, the
//! drawing mode indicator, the error taxonomy and the event bus that carries
//! store and session notifications to the map synchronizer and UI panels.

pub mod error;
pub mod event_bus;
pub mod feature;
pub mod geo;
pub mod mode;

pub use error::{Error, GeocodingError, Result, StoreError};

pub use event_bus::{
    AppEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter, MapEvent,
    SessionEvent, StoreEvent, SubscriptionId, ViewportOrigin,
};

pub use feature::{
    Feature, FeatureId, FeatureKind, FeaturePatch, FeatureRecord, FeatureStyle, AOI_COLOR,
    DEFAULT_COLOR,
};

pub use geo::{clamp_zoom, LatLon, Viewport, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

pub use mode::DrawingMode;
