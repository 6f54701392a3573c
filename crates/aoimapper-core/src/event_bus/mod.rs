//! # Event Bus Module
//!
//! Decoupled notification channel between the feature store, the pointer
//! router and the map synchronizer.
//!
//! ## Overview
//!
//! - The store publishes a [`StoreEvent`] after every mutation, carrying a
//!   snapshot of what changed, so subscribers never borrow the store.
//! - The pointer router publishes [`SessionEvent`]s while a line or polygon
//!   is being captured.
//! - Handlers run synchronously on the publishing thread, in subscription
//!   order, once per published event. Nothing is batched or coalesced.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aoimapper_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, StoreEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Store]),
//!     |event| {
//!         if let AppEvent::Store(StoreEvent::FeaturesChanged { features }) = event {
//!             println!("{} features", features.len());
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
