//! In-progress multi-vertex capture.

use aoimapper_core::{DrawingMode, LatLon};

/// Vertices collected for a line or polygon that has not been finalized.
///
/// A session is tied to the mode it was started in; pushing under a
/// different mode starts over. It also remembers which mode change of the
/// store it belongs to, see [`MapStore::mode_changes`].
///
/// [`MapStore::mode_changes`]: aoimapper_store::MapStore::mode_changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingSession {
    mode: DrawingMode,
    vertices: Vec<LatLon>,
    epoch: u64,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex captured under `mode`, discarding vertices that
    /// belonged to another mode. Returns the new pending count.
    pub fn push(&mut self, mode: DrawingMode, vertex: LatLon) -> usize {
        if self.mode != mode {
            self.reset(mode);
        }
        self.vertices.push(vertex);
        self.vertices.len()
    }

    /// Drop all pending vertices and rebind to `mode`.
    pub fn reset(&mut self, mode: DrawingMode) {
        self.mode = mode;
        self.vertices.clear();
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop all pending vertices and rebind to `mode` at `epoch`. Returns
    /// whether any vertices were dropped.
    pub fn restart(&mut self, mode: DrawingMode, epoch: u64) -> bool {
        let dropped = !self.vertices.is_empty();
        self.reset(mode);
        self.epoch = epoch;
        dropped
    }

    /// Remove and return the pending vertices, in click order.
    pub fn take(&mut self) -> Vec<LatLon> {
        std::mem::take(&mut self.vertices)
    }
}
