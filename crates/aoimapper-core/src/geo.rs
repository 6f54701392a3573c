//! Geographic primitives: coordinates and the map viewport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest zoom level the viewport accepts.
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level the viewport accepts (tile providers stop at 19).
pub const MAX_ZOOM: u8 = 19;

/// Zoom level used when nothing has been persisted yet.
pub const DEFAULT_ZOOM: u8 = 10;

/// Default map centre: Münster, NRW.
pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 51.9607,
    lon: 7.6261,
};

/// Clamp an arbitrary zoom request into `[MIN_ZOOM, MAX_ZOOM]`.
pub fn clamp_zoom(zoom: i32) -> u8 {
    zoom.clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
}

/// A WGS84 coordinate pair.
///
/// Serialized as a `[lat, lon]` array. Neither component is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Creates a new coordinate.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// False for NaN or infinite components, which JSON cannot carry.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(point: LatLon) -> Self {
        [point.lat, point.lon]
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// The map's centre coordinate and integer zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

impl Viewport {
    /// Creates a viewport, clamping the zoom level.
    pub fn new(center: LatLon, zoom: i32) -> Self {
        Self {
            center,
            zoom: clamp_zoom(zoom),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ z{}", self.center, self.zoom)
    }
}
