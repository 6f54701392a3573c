//! Overlay primitives.
//!
//! Rendering is total: callers always produce the complete drawable list
//! for the current features and session and hand it to
//! [`MapView::replace_overlays`](crate::MapView::replace_overlays).

use aoimapper_core::{Feature, FeatureId, FeatureKind, LatLon};
use serde::Serialize;

/// Vertex markers of the pending session.
pub const SESSION_VERTEX_COLOR: &str = "#ff0000";
/// Dashed preview path of the pending session.
pub const SESSION_PATH_COLOR: &str = "#ff9999";

const POINT_RADIUS: f64 = 6.0;
const SESSION_VERTEX_RADIUS: f64 = 4.0;
const STROKE_WEIGHT: f64 = 2.0;
const SESSION_DASH: &str = "5, 5";

/// Geometry of one drawable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    /// Circle marker with a radius in pixels
    Marker { at: LatLon, radius: f64 },
    /// Open polyline
    Path { vertices: Vec<LatLon> },
    /// Closed, filled ring
    Ring { vertices: Vec<LatLon> },
}

/// Stroke and fill options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: Option<f64>,
    pub dash: Option<String>,
}

impl PathStyle {
    fn stroke(color: &str, opacity: f64) -> Self {
        Self {
            color: color.to_string(),
            weight: STROKE_WEIGHT,
            opacity,
            fill_opacity: None,
            dash: None,
        }
    }

    fn filled(mut self, fill_opacity: f64) -> Self {
        self.fill_opacity = Some(fill_opacity);
        self
    }
}

/// A single overlay primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawable {
    pub shape: Shape,
    pub style: PathStyle,
    /// Popup text; session feedback has none.
    pub popup: Option<String>,
    /// The feature this was drawn for; `None` for session feedback.
    pub feature: Option<FeatureId>,
}

impl Drawable {
    pub fn is_session_feedback(&self) -> bool {
        self.feature.is_none()
    }
}

/// Drawable for one committed feature, shaped by its kind.
pub fn render_feature(feature: &Feature) -> Drawable {
    let color = feature.style.color_or_default();
    let vertices = feature.vertices();
    let (shape, style) = match feature.kind() {
        FeatureKind::Point => (
            Shape::Marker {
                at: vertices[0],
                radius: POINT_RADIUS,
            },
            PathStyle::stroke(color, 0.8).filled(0.6),
        ),
        FeatureKind::Line => (
            Shape::Path {
                vertices: vertices.to_vec(),
            },
            PathStyle::stroke(color, 0.7),
        ),
        FeatureKind::Polygon => (
            Shape::Ring {
                vertices: vertices.to_vec(),
            },
            PathStyle::stroke(color, 0.7).filled(0.3),
        ),
    };

    Drawable {
        shape,
        style,
        popup: Some(feature.display_name().to_string()),
        feature: Some(feature.id().clone()),
    }
}

/// One drawable per feature, in list order.
pub fn render_features(features: &[Feature]) -> Vec<Drawable> {
    features.iter().map(render_feature).collect()
}

/// Ephemeral feedback for pending vertices: a marker per vertex and, from
/// two vertices on, a dashed path through them.
pub fn render_session(vertices: &[LatLon]) -> Vec<Drawable> {
    let mut drawables: Vec<Drawable> = vertices
        .iter()
        .map(|at| Drawable {
            shape: Shape::Marker {
                at: *at,
                radius: SESSION_VERTEX_RADIUS,
            },
            style: PathStyle {
                color: SESSION_VERTEX_COLOR.to_string(),
                weight: STROKE_WEIGHT,
                opacity: 1.0,
                fill_opacity: Some(0.8),
                dash: None,
            },
            popup: None,
            feature: None,
        })
        .collect();

    if vertices.len() >= 2 {
        drawables.push(Drawable {
            shape: Shape::Path {
                vertices: vertices.to_vec(),
            },
            style: PathStyle {
                color: SESSION_PATH_COLOR.to_string(),
                weight: STROKE_WEIGHT,
                opacity: 1.0,
                fill_opacity: None,
                dash: Some(SESSION_DASH.to_string()),
            },
            popup: None,
            feature: None,
        });
    }

    drawables
}

/// Complete overlay: committed features first, then session feedback on
/// top.
pub fn render_overlay(features: &[Feature], session: &[LatLon]) -> Vec<Drawable> {
    let mut drawables = render_features(features);
    drawables.extend(render_session(session));
    drawables
}
