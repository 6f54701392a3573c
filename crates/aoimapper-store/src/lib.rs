//! AOI Mapper Store Crate
//!
//! Holds the canonical feature list and viewport state, notifies
//! subscribers through the event bus after every mutation, and persists
//! the state to a versioned JSON file.

pub mod persistence;
pub mod state;
pub mod store;

pub use persistence::{default_storage_path, StatePersistence, STORE_VERSION};
pub use state::MapState;
pub use store::MapStore;
