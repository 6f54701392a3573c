//! Drawing tool selection.

use aoimapper_core::DrawingMode;
use aoimapper_store::MapStore;

/// A tool button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolButton {
    pub mode: DrawingMode,
    pub label: &'static str,
}

/// Toolbar buttons in display order.
pub const TOOLS: [ToolButton; 3] = [
    ToolButton {
        mode: DrawingMode::Point,
        label: "Draw Point",
    },
    ToolButton {
        mode: DrawingMode::Line,
        label: "Draw Line",
    },
    ToolButton {
        mode: DrawingMode::Polygon,
        label: "Draw Polygon",
    },
];

/// Toolbar that toggles the drawing mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrawingToolbar;

impl DrawingToolbar {
    pub fn new() -> Self {
        Self
    }

    pub fn tools(&self) -> &'static [ToolButton] {
        &TOOLS
    }

    /// Select `mode`, or switch drawing off if it is already active.
    pub fn activate(&self, store: &mut MapStore, mode: DrawingMode) {
        let next = if store.drawing_mode() == mode {
            DrawingMode::None
        } else {
            mode
        };
        store.set_drawing_mode(next);
    }

    pub fn is_active(&self, store: &MapStore, mode: DrawingMode) -> bool {
        mode != DrawingMode::None && store.drawing_mode() == mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoimapper_core::EventBus;
    use std::sync::Arc;

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = DrawingToolbar::new().tools().iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["Draw Point", "Draw Line", "Draw Polygon"]);
    }

    #[test]
    fn test_activate_toggles() {
        let mut store = MapStore::new(Arc::new(EventBus::new()));
        let toolbar = DrawingToolbar::new();

        toolbar.activate(&mut store, DrawingMode::Line);
        assert!(toolbar.is_active(&store, DrawingMode::Line));
        assert!(!toolbar.is_active(&store, DrawingMode::Point));

        toolbar.activate(&mut store, DrawingMode::Polygon);
        assert_eq!(store.drawing_mode(), DrawingMode::Polygon);

        toolbar.activate(&mut store, DrawingMode::Polygon);
        assert_eq!(store.drawing_mode(), DrawingMode::None);
        assert!(!toolbar.is_active(&store, DrawingMode::None));
    }
}
