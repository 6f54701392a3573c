//! AOI Mapper Settings Crate
//!
//! Handles application configuration: map defaults, tile and imagery
//! sources, geocoding, and where the feature store is kept.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{
    BaseMapSettings, Config, GeocodingSettings, ImagerySettings, StorageSettings,
    ViewportSettings,
};
pub use error::{SettingsError, SettingsResult};
pub use manager::SettingsManager;
