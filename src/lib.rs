//! # AOI Mapper
//!
//! Interactive area-of-interest annotation over satellite imagery maps.
//! Users draw points, lines and polygons on top of a base map with a WMS
//! imagery overlay; the drawings, viewport and layer visibility survive
//! restarts.
//!
//! ## Architecture
//!
//! AOI Mapper is organized as a workspace with multiple crates:
//!
//! 1. **aoimapper-core** - Geo and feature types, drawing modes, errors, event bus
//! 2. **aoimapper-store** - The feature store and its versioned persistence
//! 3. **aoimapper-designer** - Drawing session and pointer event routing
//! 4. **aoimapper-visualizer** - Overlay rendering and map/store synchronization
//! 5. **aoimapper-settings** - Configuration files
//! 6. **aoimapper-geocoding** - Location search
//! 7. **aoimapper-ui** - Headless view models for the panels
//! 8. **aoimapper** - Application wiring and the command shell binary

pub mod app;
pub mod shell;

pub use app::{default_state, nominatim_client, App};
pub use shell::{execute, Command, CommandError};

pub use aoimapper_core::{
    AppEvent, DrawingMode, Error, EventBus, Feature, FeatureId, FeatureKind, FeatureStyle, LatLon,
    Result, Viewport,
};
pub use aoimapper_designer::{PointerEvent, PointerOutcome, PointerRouter};
pub use aoimapper_settings::{Config, SettingsManager};
pub use aoimapper_store::{MapState, MapStore, StatePersistence};
pub use aoimapper_visualizer::{MapView, RecordingMapView, Synchronizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to the command shell
/// - RUST_LOG environment variable support, `info` otherwise
/// - JSON lines instead of pretty output when `AOIMAPPER_LOG_FORMAT=json`
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("AOIMAPPER_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
    });
    let pretty_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()?;

    Ok(())
}
