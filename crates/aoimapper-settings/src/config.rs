//! Configuration for AOI Mapper
//!
//! Supports JSON and TOML file formats; the format is chosen by file
//! extension. Every section falls back to its defaults when missing, so a
//! partial file is always valid input.
//!
//! Configuration is organized into logical sections:
//! - Viewport defaults (start position, zoom range)
//! - Base map tile source
//! - Satellite imagery (WMS) source
//! - Geocoding service
//! - Feature store location

use crate::error::{SettingsError, SettingsResult};
use aoimapper_core::{LatLon, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the map starts and how far it can zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Start centre as `[lat, lon]`
    pub default_center: LatLon,
    pub default_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Base street map tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMapSettings {
    /// Tile URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub tile_url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for BaseMapSettings {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: MAX_ZOOM,
        }
    }
}

/// WMS satellite imagery overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagerySettings {
    pub url: String,
    pub layer: String,
    pub format: String,
    pub transparent: bool,
    pub attribution: String,
}

impl Default for ImagerySettings {
    fn default() -> Self {
        Self {
            url: "https://www.wms.nrw.de/geobasis/wms_nw_dop".to_string(),
            layer: "nw_dop_rgb".to_string(),
            format: "image/png".to_string(),
            transparent: true,
            attribution: "© NRW DOP".to_string(),
        }
    }
}

/// Location search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingSettings {
    pub base_url: String,
    /// Sent with every request; Nominatim rejects anonymous clients
    pub user_agent: String,
    pub result_limit: u32,
    /// Trimmed queries shorter than this are not sent
    pub min_query_length: usize,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "AOI-Satellite-Mapper".to_string(),
            result_limit: 5,
            min_query_length: 2,
            debounce_ms: 300,
            timeout_secs: 10,
        }
    }
}

impl GeocodingSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Feature store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// File stem of the store file
    pub namespace: String,
    /// Overrides the platform config directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: "map-store".to_string(),
            directory: None,
        }
    }
}

impl StorageSettings {
    /// Store file under `directory`, or under `fallback_dir` when no
    /// override is configured.
    pub fn store_file(&self, fallback_dir: &Path) -> PathBuf {
        self.directory
            .as_deref()
            .unwrap_or(fallback_dir)
            .join(format!("{}.json", self.namespace))
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub viewport: ViewportSettings,
    pub base_map: BaseMapSettings,
    pub imagery: ImagerySettings,
    pub geocoding: GeocodingSettings,
    pub storage: StorageSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(SettingsError::read(path))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(SettingsError::write(path))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let viewport = &self.viewport;
        if viewport.min_zoom > viewport.max_zoom {
            return Err(SettingsError::invalid(
                "viewport.min_zoom",
                format!("{} is above max_zoom {}", viewport.min_zoom, viewport.max_zoom),
            ));
        }
        if viewport.max_zoom > MAX_ZOOM {
            return Err(SettingsError::invalid(
                "viewport.max_zoom",
                format!("must be at most {}", MAX_ZOOM),
            ));
        }
        if !(viewport.min_zoom..=viewport.max_zoom).contains(&viewport.default_zoom) {
            return Err(SettingsError::invalid(
                "viewport.default_zoom",
                format!(
                    "must be within {}..={}",
                    viewport.min_zoom, viewport.max_zoom
                ),
            ));
        }
        let center = viewport.default_center;
        if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lon) {
            return Err(SettingsError::invalid(
                "viewport.default_center",
                format!("{} is not a valid coordinate", center),
            ));
        }

        for (key, value) in [
            ("base_map.tile_url", &self.base_map.tile_url),
            ("imagery.url", &self.imagery.url),
            ("imagery.layer", &self.imagery.layer),
            ("geocoding.base_url", &self.geocoding.base_url),
            ("storage.namespace", &self.storage.namespace),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }

        if self.geocoding.result_limit == 0 {
            return Err(SettingsError::invalid("geocoding.result_limit", "must be > 0"));
        }

        Ok(())
    }
}
