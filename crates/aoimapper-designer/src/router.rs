//! Pointer event routing.
//!
//! The router is the only component that interprets clicks on the map. It
//! reads the drawing mode from the store on every event, keeps pending
//! vertices in a [`DrawingSession`] and writes finished geometry back with
//! [`MapStore::add_feature`].

use crate::session::DrawingSession;
use aoimapper_core::{
    AppEvent, DrawingMode, EventBus, EventCategory, EventFilter, Feature, FeatureId, FeatureKind,
    FeatureStyle, LatLon, SessionEvent, StoreEvent, SubscriptionId,
};
use aoimapper_store::MapStore;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// A click delivered by the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Left click / tap.
    Primary(LatLon),
    /// Right click / context menu.
    Secondary(LatLon),
}

impl PointerEvent {
    pub fn position(&self) -> LatLon {
        match self {
            PointerEvent::Primary(p) | PointerEvent::Secondary(p) => *p,
        }
    }

    /// The host must not open its native context menu for secondary
    /// clicks on the map surface, whatever the drawing mode.
    pub fn suppresses_native_menu(&self) -> bool {
        matches!(self, PointerEvent::Secondary(_))
    }
}

/// What the router did with a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing to do in the current mode.
    Ignored,
    /// A feature was added to the store.
    Committed(FeatureId),
    /// A vertex was appended; `pending` is the new session length.
    VertexAdded { pending: usize },
    /// The session was finalized with too few vertices and dropped.
    Discarded { pending: usize },
}

/// Mode-aware click handler owning the in-progress drawing session.
pub struct PointerRouter {
    bus: Arc<EventBus>,
    session: Arc<Mutex<DrawingSession>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl PointerRouter {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            session: Arc::new(Mutex::new(DrawingSession::new())),
            subscription: Mutex::new(None),
        }
    }

    /// Start listening for drawing mode changes. Any change of mode clears
    /// the pending session and its visual feedback. Calling twice is a
    /// no-op.
    pub fn attach(&self) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }

        let session = Arc::clone(&self.session);
        // Weak so the handler stored inside the bus does not keep the bus alive.
        let bus: Weak<EventBus> = Arc::downgrade(&self.bus);
        let id = self.bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Store]),
            move |event| {
                if let AppEvent::Store(StoreEvent::DrawingModeChanged { previous, current }) = event
                {
                    if previous == current {
                        return;
                    }
                    session.lock().reset(*current);
                    tracing::debug!("Drawing session reset for {} mode", current);
                    if let Some(bus) = bus.upgrade() {
                        let _ = bus.publish(AppEvent::Session(SessionEvent::Cleared));
                    }
                }
            },
        );
        *subscription = Some(id);
    }

    /// Stop listening for mode changes.
    pub fn detach(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.bus.unsubscribe(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Snapshot of the pending vertices.
    pub fn pending_vertices(&self) -> Vec<LatLon> {
        self.session.lock().vertices().to_vec()
    }

    /// Route a pointer event according to the store's current drawing mode.
    ///
    /// Clicks at non-finite positions are ignored. A mode change the router
    /// did not hear about, because it was detached, still discards the
    /// session before the click is handled.
    pub fn handle(&self, store: &mut MapStore, event: PointerEvent) -> PointerOutcome {
        if !event.position().is_finite() {
            tracing::warn!("Ignoring click at non-finite position {}", event.position());
            return PointerOutcome::Ignored;
        }

        let mode = store.drawing_mode();
        let epoch = store.mode_changes();
        let dropped = {
            let mut session = self.session.lock();
            session.epoch() != epoch && session.restart(mode, epoch)
        };
        if dropped {
            tracing::debug!("Drawing session reset for {} mode", mode);
            self.publish(SessionEvent::Cleared);
        }

        match (mode, event) {
            (DrawingMode::None, _) => PointerOutcome::Ignored,
            (DrawingMode::Point, PointerEvent::Primary(at)) => {
                let feature = Feature::point(at);
                let id = feature.id().clone();
                tracing::info!("Point {} added at {}", id, at);
                store.add_feature(feature);
                PointerOutcome::Committed(id)
            }
            (DrawingMode::Point, PointerEvent::Secondary(_)) => PointerOutcome::Ignored,
            (DrawingMode::Line | DrawingMode::Polygon, PointerEvent::Primary(at)) => {
                self.add_vertex(mode, at)
            }
            (DrawingMode::Line | DrawingMode::Polygon, PointerEvent::Secondary(_)) => {
                self.finalize(store, mode)
            }
        }
    }

    fn add_vertex(&self, mode: DrawingMode, at: LatLon) -> PointerOutcome {
        let (pending, vertices) = {
            let mut session = self.session.lock();
            let pending = session.push(mode, at);
            (pending, session.vertices().to_vec())
        };
        tracing::trace!("{} vertex {} at {}", mode, pending, at);
        self.publish(SessionEvent::Updated { mode, vertices });
        PointerOutcome::VertexAdded { pending }
    }

    fn finalize(&self, store: &mut MapStore, mode: DrawingMode) -> PointerOutcome {
        let vertices = {
            let mut session = self.session.lock();
            if session.mode() != mode {
                // Stale vertices from another mode never become geometry.
                session.reset(mode);
                Vec::new()
            } else {
                session.take()
            }
        };
        if vertices.is_empty() {
            return PointerOutcome::Ignored;
        }

        let kind = match mode {
            DrawingMode::Line => FeatureKind::Line,
            _ => FeatureKind::Polygon,
        };
        let pending = vertices.len();
        let feature = Feature::new(kind, vertices, FeatureStyle::default_for(kind));

        self.publish(SessionEvent::Cleared);

        match feature {
            Some(feature) => {
                let id = feature.id().clone();
                tracing::info!("{} {} added with {} vertices", kind, id, pending);
                store.add_feature(feature);
                PointerOutcome::Committed(id)
            }
            None => {
                tracing::debug!(
                    "{} session discarded with {} of {} vertices",
                    kind,
                    pending,
                    kind.min_vertices()
                );
                PointerOutcome::Discarded { pending }
            }
        }
    }

    fn publish(&self, event: SessionEvent) {
        let _ = self.bus.publish(AppEvent::Session(event));
    }
}

impl Drop for PointerRouter {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for PointerRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerRouter")
            .field("session", &*self.session.lock())
            .field("attached", &self.is_attached())
            .finish()
    }
}
