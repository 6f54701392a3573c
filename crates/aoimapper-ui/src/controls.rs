//! Zoom and fullscreen buttons.

use aoimapper_core::{MAX_ZOOM, MIN_ZOOM};
use aoimapper_store::MapStore;

/// Map control buttons.
///
/// Fullscreen is a request the host fulfils; failing to enter fullscreen
/// is only logged.
#[derive(Debug, Default)]
pub struct MapControls {
    fullscreen_requested: bool,
}

impl MapControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom_in(&self, store: &mut MapStore) {
        let zoom = (store.zoom() + 1).min(MAX_ZOOM);
        store.set_zoom(i32::from(zoom));
    }

    pub fn zoom_out(&self, store: &mut MapStore) {
        let zoom = store.zoom().saturating_sub(1).max(MIN_ZOOM);
        store.set_zoom(i32::from(zoom));
    }

    pub fn request_fullscreen(&mut self) {
        self.fullscreen_requested = true;
    }

    /// Consume a pending fullscreen request.
    pub fn take_fullscreen_request(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    /// Report the host's answer to a fullscreen request.
    pub fn fullscreen_result(&self, result: Result<(), String>) {
        if let Err(e) = result {
            tracing::info!("Fullscreen request failed: {}", e);
        }
    }
}
