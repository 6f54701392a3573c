//! Committed annotation features.
//!
//! A [`Feature`] can only be constructed once its vertex count satisfies the
//! minimum for its kind, so a feature in the store is always well formed.
//! [`FeatureRecord`] is the unchecked wire form used for persistence; converting
//! a record back into a feature re-applies the vertex-count check.

use crate::geo::LatLon;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default colour for points and lines.
pub const DEFAULT_COLOR: &str = "#0066cc";

/// Colour used for polygons created as areas of interest.
pub const AOI_COLOR: &str = "#00cc99";

/// Opaque, immutable feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the id, used for short display labels.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geometry kind of a feature. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Point,
    Line,
    Polygon,
}

impl FeatureKind {
    /// Minimum number of vertices a feature of this kind needs.
    pub fn min_vertices(&self) -> usize {
        match self {
            Self::Point => 1,
            Self::Line => 2,
            Self::Polygon => 3,
        }
    }

    /// Whether `count` vertices form a valid feature of this kind.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Self::Point => count == 1,
            Self::Line | Self::Polygon => count >= self.min_vertices(),
        }
    }

    /// Label shown when a feature has no name of its own.
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Line => "Line",
            Self::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point => write!(f, "point"),
            Self::Line => write!(f, "line"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

/// Display properties of a feature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FeatureStyle {
    /// Default style applied when the pointer router commits a feature.
    pub fn default_for(kind: FeatureKind) -> Self {
        let (name, color) = match kind {
            FeatureKind::Point => ("Point", DEFAULT_COLOR),
            FeatureKind::Line => ("Line", DEFAULT_COLOR),
            FeatureKind::Polygon => ("Area of Interest", AOI_COLOR),
        };
        Self {
            name: Some(name.to_string()),
            description: None,
            color: Some(color.to_string()),
        }
    }

    /// Colour to draw with, falling back to [`DEFAULT_COLOR`].
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// A committed geometric annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeatureRecord", into = "FeatureRecord")]
pub struct Feature {
    id: FeatureId,
    kind: FeatureKind,
    vertices: Vec<LatLon>,
    pub style: FeatureStyle,
}

impl Feature {
    /// Builds a feature with a fresh id, or `None` when the vertex count is
    /// below what `kind` requires or a vertex is not finite.
    pub fn new(kind: FeatureKind, vertices: Vec<LatLon>, style: FeatureStyle) -> Option<Self> {
        Self::with_id(FeatureId::generate(), kind, vertices, style)
    }

    /// Builds a feature with an explicit id.
    pub fn with_id(
        id: FeatureId,
        kind: FeatureKind,
        vertices: Vec<LatLon>,
        style: FeatureStyle,
    ) -> Option<Self> {
        if !kind.accepts(vertices.len()) || !vertices.iter().all(LatLon::is_finite) {
            return None;
        }
        Some(Self {
            id,
            kind,
            vertices,
            style,
        })
    }

    /// A single-vertex point feature with the default point style.
    pub fn point(at: LatLon) -> Self {
        Self {
            id: FeatureId::generate(),
            kind: FeatureKind::Point,
            vertices: vec![at],
            style: FeatureStyle::default_for(FeatureKind::Point),
        }
    }

    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    /// Name shown in panels and popups.
    pub fn display_name(&self) -> &str {
        self.style
            .name
            .as_deref()
            .unwrap_or_else(|| self.kind.fallback_label())
    }

    /// Applies a partial update. Replacement vertices that would break the
    /// vertex-count rule for this kind, or that are not finite, are rejected and the existing geometry
    /// is kept; returns whether anything changed.
    pub fn apply(&mut self, patch: FeaturePatch) -> bool {
        let mut changed = false;
        if let Some(style) = patch.style {
            if style != self.style {
                self.style = style;
                changed = true;
            }
        }
        if let Some(vertices) = patch.vertices {
            if self.kind.accepts(vertices.len()) && vertices.iter().all(LatLon::is_finite) {
                if vertices != self.vertices {
                    self.vertices = vertices;
                    changed = true;
                }
            } else {
                tracing::warn!(
                    "Ignoring {} replacement vertices for {} feature {}",
                    vertices.len(),
                    self.kind,
                    self.id
                );
            }
        }
        changed
    }
}

/// Partial update for [`Feature::apply`]. Id and kind cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePatch {
    pub style: Option<FeatureStyle>,
    pub vertices: Option<Vec<LatLon>>,
}

impl FeaturePatch {
    pub fn style(style: FeatureStyle) -> Self {
        Self {
            style: Some(style),
            vertices: None,
        }
    }

    pub fn vertices(vertices: Vec<LatLon>) -> Self {
        Self {
            style: None,
            vertices: Some(vertices),
        }
    }
}

/// Unchecked wire form of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: FeatureId,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(rename = "coordinates")]
    pub vertices: Vec<LatLon>,
    #[serde(default, rename = "properties")]
    pub style: FeatureStyle,
}

impl TryFrom<FeatureRecord> for Feature {
    type Error = String;

    fn try_from(record: FeatureRecord) -> std::result::Result<Self, Self::Error> {
        let count = record.vertices.len();
        let kind = record.kind;
        let id = record.id.clone();
        Feature::with_id(record.id, record.kind, record.vertices, record.style)
            .ok_or_else(|| format!("{} feature {} has {} vertices", kind, id, count))
    }
}

impl From<Feature> for FeatureRecord {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id,
            kind: feature.kind,
            vertices: feature.vertices,
            style: feature.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(n: usize) -> Vec<LatLon> {
        (0..n).map(|i| LatLon::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_vertex_minimums() {
        assert!(Feature::new(FeatureKind::Point, pts(1), FeatureStyle::default()).is_some());
        assert!(Feature::new(FeatureKind::Point, pts(2), FeatureStyle::default()).is_none());
        assert!(Feature::new(FeatureKind::Line, pts(1), FeatureStyle::default()).is_none());
        assert!(Feature::new(FeatureKind::Line, pts(2), FeatureStyle::default()).is_some());
        assert!(Feature::new(FeatureKind::Polygon, pts(2), FeatureStyle::default()).is_none());
        assert!(Feature::new(FeatureKind::Polygon, pts(3), FeatureStyle::default()).is_some());
    }

    #[test]
    fn test_default_styles() {
        let point = FeatureStyle::default_for(FeatureKind::Point);
        assert_eq!(point.name.as_deref(), Some("Point"));
        assert_eq!(point.color.as_deref(), Some(DEFAULT_COLOR));

        let polygon = FeatureStyle::default_for(FeatureKind::Polygon);
        assert_eq!(polygon.name.as_deref(), Some("Area of Interest"));
        assert_eq!(polygon.color.as_deref(), Some(AOI_COLOR));
    }

    #[test]
    fn test_patch_rejects_invalid_vertices() {
        let mut line =
            Feature::new(FeatureKind::Line, pts(2), FeatureStyle::default()).unwrap();
        assert!(!line.apply(FeaturePatch::vertices(pts(1))));
        assert_eq!(line.vertices().len(), 2);

        assert!(line.apply(FeaturePatch::vertices(pts(4))));
        assert_eq!(line.vertices().len(), 4);

        let mut bad = pts(3);
        bad[1].lat = f64::NAN;
        assert!(!line.apply(FeaturePatch::vertices(bad.clone())));
        assert_eq!(line.vertices(), pts(4).as_slice());
        assert!(Feature::new(FeatureKind::Polygon, bad, FeatureStyle::default()).is_none());
    }

    #[test]
    fn test_wire_format() {
        let feature = Feature::with_id(
            FeatureId::from("abc123"),
            FeatureKind::Point,
            vec![LatLon::new(52.0, 7.0)],
            FeatureStyle::default_for(FeatureKind::Point),
        )
        .unwrap();

        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "point");
        assert_eq!(json["coordinates"][0][0], 52.0);
        assert_eq!(json["properties"]["color"], DEFAULT_COLOR);

        let invalid = r#"{"id":"x","type":"line","coordinates":[[1.0,2.0]]}"#;
        assert!(serde_json::from_str::<Feature>(invalid).is_err());
    }

    #[test]
    fn test_short_id() {
        let id = FeatureId::from("abcdef");
        assert_eq!(id.short(4), "abcd");
        assert_eq!(FeatureId::from("ab").short(4), "ab");
    }
}
