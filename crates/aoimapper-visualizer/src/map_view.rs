//! The seam between the synchronizer and a concrete map widget.

use crate::layers::{BaseTileLayer, ImageryLayer};
use crate::overlay::Drawable;
use aoimapper_core::Viewport;

/// Commands the synchronizer issues to a live map.
///
/// Implementations must not call back into the store from inside these
/// methods; user interaction is reported separately through
/// [`Synchronizer::map_viewport_changed`](crate::Synchronizer::map_viewport_changed).
pub trait MapView: Send + 'static {
    /// What the map is showing right now.
    fn current_view(&self) -> Viewport;

    /// Recentre and rezoom.
    fn set_view(&mut self, viewport: Viewport);

    fn add_base_layer(&mut self, layer: &BaseTileLayer);

    fn attach_imagery(&mut self, layer: &ImageryLayer);

    fn detach_imagery(&mut self);

    /// Drop every overlay primitive and draw `drawables` instead.
    fn replace_overlays(&mut self, drawables: Vec<Drawable>);

    fn clear_overlays(&mut self);
}

/// Headless map that remembers what it was told to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingMapView {
    viewport: Viewport,
    base_layer: Option<BaseTileLayer>,
    imagery: Option<ImageryLayer>,
    overlays: Vec<Drawable>,
    redraws: usize,
    recenters: usize,
}

impl RecordingMapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn base_layer(&self) -> Option<&BaseTileLayer> {
        self.base_layer.as_ref()
    }

    pub fn imagery(&self) -> Option<&ImageryLayer> {
        self.imagery.as_ref()
    }

    pub fn imagery_attached(&self) -> bool {
        self.imagery.is_some()
    }

    pub fn overlays(&self) -> &[Drawable] {
        &self.overlays
    }

    /// Overlay primitives that belong to committed features.
    pub fn feature_overlays(&self) -> impl Iterator<Item = &Drawable> {
        self.overlays.iter().filter(|d| !d.is_session_feedback())
    }

    /// Overlay primitives that are pending-session feedback.
    pub fn session_overlays(&self) -> impl Iterator<Item = &Drawable> {
        self.overlays.iter().filter(|d| d.is_session_feedback())
    }

    /// Number of full overlay redraws.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Number of programmatic `set_view` calls.
    pub fn recenter_count(&self) -> usize {
        self.recenters
    }

    /// Simulate the user panning or zooming. Does not count as a recentre.
    pub fn user_moved_to(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

impl MapView for RecordingMapView {
    fn current_view(&self) -> Viewport {
        self.viewport
    }

    fn set_view(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.recenters += 1;
    }

    fn add_base_layer(&mut self, layer: &BaseTileLayer) {
        self.base_layer = Some(layer.clone());
    }

    fn attach_imagery(&mut self, layer: &ImageryLayer) {
        self.imagery = Some(layer.clone());
    }

    fn detach_imagery(&mut self) {
        self.imagery = None;
    }

    fn replace_overlays(&mut self, drawables: Vec<Drawable>) {
        self.overlays = drawables;
        self.redraws += 1;
    }

    fn clear_overlays(&mut self) {
        self.overlays.clear();
    }
}
