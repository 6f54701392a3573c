//! The bus itself: synchronous handlers plus an async broadcast tap.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{AppEvent, EventCategory};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a handler wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any of the listed categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

/// Bus tuning.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Buffer of the async broadcast channel; slow receivers lag past this.
    pub channel_capacity: usize,
    /// How many recent events to keep for [`EventBus::journal`]. Zero
    /// disables the journal.
    pub journal_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            journal_size: 0,
        }
    }
}

/// Returned by [`EventBus::publish`] when the event reached nobody.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Publish/subscribe hub shared as `Arc<EventBus>`.
///
/// Handlers run on the publisher's thread, in the order they subscribed,
/// before `publish` returns. The handler list is copied before dispatch, so
/// a handler may publish, subscribe or unsubscribe without deadlocking.
pub struct EventBus {
    handlers: RwLock<Vec<Subscription>>,
    tap: broadcast::Sender<AppEvent>,
    journal: Mutex<VecDeque<AppEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (tap, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            handlers: RwLock::new(Vec::new()),
            tap,
            journal: Mutex::new(VecDeque::with_capacity(config.journal_size)),
            config,
        }
    }

    /// Deliver `event` to every matching handler and async receiver.
    ///
    /// Returns how many were reached.
    pub fn publish(&self, event: AppEvent) -> Result<usize, EventBusError> {
        tracing::trace!("Publishing {}", event.description());

        if self.config.journal_size > 0 {
            let mut journal = self.journal.lock();
            if journal.len() == self.config.journal_size {
                journal.pop_front();
            }
            journal.push_back(event.clone());
        }

        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| Arc::clone(&s.handler))
            .collect();
        for handler in &handlers {
            handler(&event);
        }

        let receivers = self.tap.send(event).unwrap_or(0);
        match handlers.len() + receivers {
            0 => Err(EventBusError::NoSubscribers),
            reached => Ok(reached),
        }
    }

    /// Register a synchronous handler. Keep it short; it blocks the
    /// publisher.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.handlers.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("{} subscribed", id);
        id
    }

    /// Remove a handler. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let Some(index) = handlers.iter().position(|s| s.id == id) else {
            return false;
        };
        handlers.remove(index);
        tracing::debug!("{} unsubscribed", id);
        true
    }

    /// Async stream of every event published from now on.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.tap.subscribe()
    }

    /// Number of synchronous handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// The most recent events, oldest first. Empty unless
    /// `journal_size` is set.
    pub fn journal(&self) -> Vec<AppEvent> {
        self.journal.lock().iter().cloned().collect()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.subscriber_count())
            .field("journal", &self.journal.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::events::{MapEvent, SessionEvent, StoreEvent};
    use crate::mode::DrawingMode;

    fn mode_changed(current: DrawingMode) -> AppEvent {
        AppEvent::Store(StoreEvent::DrawingModeChanged {
            previous: DrawingMode::None,
            current,
        })
    }

    fn counter(bus: &EventBus, filter: EventFilter) -> Arc<Mutex<usize>> {
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        bus.subscribe(filter, move |_| *sink.lock() += 1);
        count
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let id = bus.subscribe(EventFilter::All, |_| {});
        let other = bus.subscribe(EventFilter::All, |_| {});
        assert_ne!(id, other);
        assert_eq!(bus.subscriber_count(), 2);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_publish_reaches_handlers() {
        let bus = EventBus::new();
        let count = counter(&bus, EventFilter::All);
        assert_eq!(bus.publish(mode_changed(DrawingMode::Point)), Ok(1));
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_publish_to_nobody() {
        let bus = EventBus::new();
        assert_eq!(
            bus.publish(AppEvent::Map(MapEvent::Mounted)),
            Err(EventBusError::NoSubscribers)
        );
    }

    #[test]
    fn test_category_filter() {
        let bus = EventBus::new();
        let store = counter(&bus, EventFilter::Categories(vec![EventCategory::Store]));
        let session = counter(&bus, EventFilter::Categories(vec![EventCategory::Session]));

        bus.publish(mode_changed(DrawingMode::Line)).ok();
        bus.publish(AppEvent::Session(SessionEvent::Cleared)).ok();
        bus.publish(AppEvent::Session(SessionEvent::Cleared)).ok();

        assert_eq!(*store.lock(), 1);
        assert_eq!(*session.lock(), 2);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let log = log.clone();
            bus.subscribe(EventFilter::All, move |_| log.lock().push(name));
        }

        bus.publish(AppEvent::Map(MapEvent::Mounted)).ok();
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handler_may_publish_and_unsubscribe() {
        let bus = Arc::new(EventBus::new());
        let inner = Arc::downgrade(&bus);
        let own_id = Arc::new(Mutex::new(None));
        let own = own_id.clone();
        let id = bus.subscribe(EventFilter::Categories(vec![EventCategory::Store]), move |_| {
            if let Some(bus) = inner.upgrade() {
                bus.publish(AppEvent::Session(SessionEvent::Cleared)).ok();
                if let Some(id) = *own.lock() {
                    bus.unsubscribe(id);
                }
            }
        });
        *own_id.lock() = Some(id);
        let cleared = counter(&bus, EventFilter::Categories(vec![EventCategory::Session]));

        bus.publish(mode_changed(DrawingMode::Polygon)).ok();
        bus.publish(mode_changed(DrawingMode::Line)).ok();

        assert_eq!(*cleared.lock(), 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_journal_keeps_latest() {
        let bus = EventBus::with_config(EventBusConfig {
            journal_size: 3,
            ..Default::default()
        });
        assert!(bus.journal().is_empty());

        for mode in [
            DrawingMode::Point,
            DrawingMode::Line,
            DrawingMode::Polygon,
            DrawingMode::None,
        ] {
            bus.publish(mode_changed(mode)).ok();
        }

        let journal = bus.journal();
        assert_eq!(journal.len(), 3);
        assert!(matches!(
            journal[0],
            AppEvent::Store(StoreEvent::DrawingModeChanged {
                current: DrawingMode::Line,
                ..
            })
        ));

        bus.clear_journal();
        assert!(bus.journal().is_empty());
    }

    #[test]
    fn test_journal_off_by_default() {
        let bus = EventBus::new();
        counter(&bus, EventFilter::All);
        bus.publish(AppEvent::Map(MapEvent::Mounted)).ok();
        assert!(bus.journal().is_empty());
    }

    #[tokio::test]
    async fn test_async_receiver() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        assert_eq!(bus.publish(mode_changed(DrawingMode::Point)), Ok(1));

        match receiver.recv().await {
            Ok(AppEvent::Store(StoreEvent::DrawingModeChanged { current, .. })) => {
                assert_eq!(current, DrawingMode::Point);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
