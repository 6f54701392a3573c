//! Search result type.

use aoimapper_core::LatLon;
use serde::{Deserialize, Deserializer, Serialize};

/// One candidate location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
    pub display_name: String,
    /// `[south, north, west, east]` as Nominatim reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundingbox: Option<[String; 4]>,
}

impl GeocodingResult {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// First comma-separated segment of the display name.
    pub fn title(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

// Nominatim sends coordinates as strings.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Coordinate::deserialize(deserializer)? {
        Coordinate::Number(n) => Ok(n),
        Coordinate::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
