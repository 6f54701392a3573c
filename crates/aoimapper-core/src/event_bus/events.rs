//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::geo::{LatLon, Viewport};
use crate::mode::DrawingMode;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Feature store mutations
    Store(StoreEvent),
    /// In-progress drawing session changes
    Session(SessionEvent),
    /// Map view lifecycle
    Map(MapEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Store(_) => EventCategory::Store,
            AppEvent::Session(_) => EventCategory::Session,
            AppEvent::Map(_) => EventCategory::Map,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Store(e) => e.description(),
            AppEvent::Session(e) => e.description(),
            AppEvent::Map(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Feature store events.
    Store,
    /// Drawing session events.
    Session,
    /// Map lifecycle events.
    Map,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Store => write!(f, "Store"),
            EventCategory::Session => write!(f, "Session"),
            EventCategory::Map => write!(f, "Map"),
        }
    }
}

/// Where a viewport mutation came from.
///
/// The synchronizer only pushes non-map origins back into the map, which
/// keeps a pan from bouncing back as a redundant recentring command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportOrigin {
    /// Zoom buttons or other UI controls
    Ui,
    /// The live map reported a pan or zoom
    Map,
    /// A geocoding result was selected
    Search,
}

/// Feature store events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    /// Centre or zoom changed.
    ViewportChanged {
        /// The full viewport after the change.
        viewport: Viewport,
        /// Who requested the change.
        origin: ViewportOrigin,
    },
    /// The imagery overlay flag flipped.
    BaseLayerVisibilityChanged {
        /// New visibility.
        visible: bool,
    },
    /// The feature list changed in any way.
    FeaturesChanged {
        /// Snapshot of the full list, in display order.
        features: Vec<Feature>,
    },
    /// The active drawing tool changed.
    DrawingModeChanged {
        /// Mode before the change.
        previous: DrawingMode,
        /// Mode after the change.
        current: DrawingMode,
    },
}

impl StoreEvent {
    pub fn description(&self) -> String {
        match self {
            StoreEvent::ViewportChanged { viewport, origin } => {
                format!("Viewport {} ({:?})", viewport, origin)
            }
            StoreEvent::BaseLayerVisibilityChanged { visible } => {
                format!("Base layer {}", if *visible { "shown" } else { "hidden" })
            }
            StoreEvent::FeaturesChanged { features } => {
                format!("{} features", features.len())
            }
            StoreEvent::DrawingModeChanged { previous, current } => {
                format!("Drawing mode {} -> {}", previous, current)
            }
        }
    }
}

/// Drawing session events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A vertex was appended to the pending geometry.
    Updated {
        /// Mode the session is capturing for.
        mode: DrawingMode,
        /// All pending vertices in click order.
        vertices: Vec<LatLon>,
    },
    /// The pending geometry was committed or discarded.
    Cleared,
}

impl SessionEvent {
    pub fn description(&self) -> String {
        match self {
            SessionEvent::Updated { mode, vertices } => {
                format!("{} session with {} vertices", mode, vertices.len())
            }
            SessionEvent::Cleared => "Session cleared".to_string(),
        }
    }
}

/// Map view lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MapEvent {
    /// The map view was set up and synced from the store.
    Mounted,
    /// The map view was torn down.
    Unmounted,
}

impl MapEvent {
    pub fn description(&self) -> String {
        match self {
            MapEvent::Mounted => "Map mounted".to_string(),
            MapEvent::Unmounted => "Map unmounted".to_string(),
        }
    }
}
