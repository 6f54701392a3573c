//! Store Persistence
//!
//! Loads and saves the feature store from/to a JSON file shaped as
//! `{"state": {...}, "version": N}`.
//! Handles schema migration, tolerates missing or unknown fields, and drops
//! features that fail the vertex-count rule instead of rejecting the file.

use crate::state::MapState;
use aoimapper_core::{clamp_zoom, Feature, FeatureRecord, LatLon, StoreError, MAX_ZOOM};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Current schema version written to disk.
pub const STORE_VERSION: u64 = 1;

/// Resolve `<config dir>/aoimapper/<namespace>.json`.
pub fn default_storage_path(namespace: &str) -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("aoimapper");
    path.push(format!("{}.json", namespace));
    path
}

/// On-disk shape of the state section. Every field is optional so partial
/// or older files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(
        default,
        deserialize_with = "lenient_zoom",
        skip_serializing_if = "Option::is_none"
    )]
    zoom: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_center",
        skip_serializing_if = "Option::is_none"
    )]
    center: Option<LatLon>,
    #[serde(
        default,
        alias = "wmsLayerVisible",
        skip_serializing_if = "Option::is_none"
    )]
    base_layer_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features: Option<Vec<Value>>,
}

/// Zoom is written as an integer; older files may hold a float.
fn lenient_zoom<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v.as_f64() {
        Some(zoom) if zoom.is_finite() => Some(zoom.round() as i64),
        _ => {
            tracing::warn!("Ignoring unreadable zoom {}", v);
            None
        }
    }))
}

/// A bad centre falls back to the default instead of failing the file.
fn lenient_center<'de, D>(deserializer: D) -> Result<Option<LatLon>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value::<LatLon>(v.clone()) {
        Ok(center) if center.is_finite() => Some(center),
        _ => {
            tracing::warn!("Ignoring unreadable centre {}", v);
            None
        }
    }))
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    state: &'a PersistedState,
    version: u64,
}

/// File-backed persistence for [`MapState`].
#[derive(Debug, Clone)]
pub struct StatePersistence {
    path: PathBuf,
}

impl StatePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persistence under the platform config directory for `namespace`.
    pub fn for_namespace(namespace: &str) -> Self {
        Self::new(default_storage_path(namespace))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state, filling absent fields from `defaults`.
    ///
    /// Returns `Ok(None)` when no file exists yet.
    pub fn load(&self, defaults: &MapState) -> Result<Option<MapState>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        decode(&content, defaults).map(Some)
    }

    /// Load the persisted state, falling back to `defaults` when the file is
    /// absent, unreadable or corrupted.
    pub fn load_or_default(&self, defaults: &MapState) -> MapState {
        match self.load(defaults) {
            Ok(Some(state)) => {
                tracing::info!(
                    "Loaded {} features from {}",
                    state.features.len(),
                    self.path.display()
                );
                state
            }
            Ok(None) => {
                tracing::debug!("No store at {}, using defaults", self.path.display());
                defaults.clone()
            }
            Err(e) => {
                tracing::warn!("{}; starting from defaults", e);
                defaults.clone()
            }
        }
    }

    /// Write the state. The file is written to a sibling temporary path and
    /// renamed into place.
    pub fn save(&self, state: &MapState) -> Result<(), StoreError> {
        let json = encode(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::trace!("Store saved to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, e: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

/// Serialize a state into the versioned envelope.
pub(crate) fn encode(state: &MapState) -> Result<String, StoreError> {
    let features = state
        .features
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let persisted = PersistedState {
        zoom: Some(i64::from(state.viewport.zoom)),
        center: Some(state.viewport.center),
        base_layer_visible: Some(state.base_layer_visible),
        features: Some(features),
    };

    Ok(serde_json::to_string_pretty(&Envelope {
        state: &persisted,
        version: STORE_VERSION,
    })?)
}

/// Decode a versioned envelope, migrating older schemas.
pub(crate) fn decode(content: &str, defaults: &MapState) -> Result<MapState, StoreError> {
    let envelope: Value = serde_json::from_str(content).map_err(|e| StoreError::Corrupted {
        reason: e.to_string(),
    })?;

    let Value::Object(mut envelope) = envelope else {
        return Err(StoreError::Corrupted {
            reason: "top level is not an object".to_string(),
        });
    };

    let version = envelope.get("version").and_then(Value::as_u64).unwrap_or(0);
    let state = envelope.remove("state").unwrap_or(Value::Object(Map::new()));
    let state = migrate(state, version);

    let persisted: PersistedState =
        serde_json::from_value(state).map_err(|e| StoreError::Corrupted {
            reason: e.to_string(),
        })?;

    let mut result = defaults.clone();
    result.drawing_mode = Default::default();
    if let Some(zoom) = persisted.zoom {
        result.viewport.zoom = clamp_zoom(zoom.clamp(0, i64::from(MAX_ZOOM)) as i32);
    }
    if let Some(center) = persisted.center {
        result.viewport.center = center;
    }
    if let Some(visible) = persisted.base_layer_visible {
        result.base_layer_visible = visible;
    }
    if let Some(features) = persisted.features {
        result.features = features.into_iter().filter_map(decode_feature).collect();
    }

    Ok(result)
}

fn decode_feature(value: Value) -> Option<Feature> {
    let record: FeatureRecord = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Dropping unreadable feature: {}", e);
            return None;
        }
    };
    match Feature::try_from(record) {
        Ok(feature) => Some(feature),
        Err(reason) => {
            tracing::warn!("Dropping invalid feature: {}", reason);
            None
        }
    }
}

/// Bring a persisted state up to [`STORE_VERSION`].
///
/// Version 0 only gains the version marker. Versions newer than this build
/// pass through untouched and are decoded best-effort.
fn migrate(mut state: Value, version: u64) -> Value {
    match version {
        0 => {
            if let Value::Object(map) = &mut state {
                map.insert("version".to_string(), Value::from(STORE_VERSION));
            }
            tracing::info!("Migrated store from version 0 to {}", STORE_VERSION);
            state
        }
        v if v > STORE_VERSION => {
            tracing::warn!(
                "Store version {} is newer than supported version {}",
                v,
                STORE_VERSION
            );
            state
        }
        _ => state,
    }
}
