//! Drawing mode indicator consumed by the pointer router.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    /// Pointer events fall through to default map behaviour.
    #[default]
    None,
    Point,
    Line,
    Polygon,
}

impl DrawingMode {
    /// Whether this mode accumulates vertices across several clicks.
    pub fn is_multi_vertex(&self) -> bool {
        matches!(self, Self::Line | Self::Polygon)
    }
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Point => write!(f, "point"),
            Self::Line => write!(f, "line"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

impl std::str::FromStr for DrawingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "point" => Ok(Self::Point),
            "line" => Ok(Self::Line),
            "polygon" | "aoi" => Ok(Self::Polygon),
            other => Err(format!("Unknown drawing mode: {}", other)),
        }
    }
}
