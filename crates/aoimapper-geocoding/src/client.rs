//! Nominatim HTTP client.

use crate::result::GeocodingResult;
use aoimapper_core::{GeocodingError, LatLon};
use std::time::Duration;

/// A location search backend.
pub trait Geocoder: Send + Sync {
    /// Candidates for a free-text query; empty on any failure.
    fn search(&self, query: &str) -> Vec<GeocodingResult>;

    /// The place at a coordinate, if any.
    fn reverse(&self, at: LatLon) -> Option<GeocodingResult>;
}

/// Connection settings for [`NominatimClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub limit: u32,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "AOI-Satellite-Mapper".to_string(),
            limit: 5,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Blocking client for the Nominatim search and reverse endpoints.
///
/// One request per call, no retries.
pub struct NominatimClient {
    agent: ureq::Agent,
    config: NominatimConfig,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self { agent, config }
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// `GET /search`, surfacing failures.
    pub fn try_search(&self, query: &str) -> Result<Vec<GeocodingResult>, GeocodingError> {
        let request = self
            .agent
            .get(&self.endpoint("search"))
            .query("q", query)
            .query("format", "json")
            .query("limit", &self.config.limit.to_string());
        let body = fetch(request)?;
        decode_search(&body)
    }

    /// `GET /reverse`, surfacing failures.
    pub fn try_reverse(&self, at: LatLon) -> Result<GeocodingResult, GeocodingError> {
        let request = self
            .agent
            .get(&self.endpoint("reverse"))
            .query("lat", &at.lat.to_string())
            .query("lon", &at.lon.to_string())
            .query("format", "json");
        let body = fetch(request)?;
        decode_reverse(&body)
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new(NominatimConfig::default())
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Vec<GeocodingResult> {
        match self.try_search(query) {
            Ok(results) => {
                tracing::debug!("Search '{}' returned {} results", query, results.len());
                results
            }
            Err(e) => {
                tracing::error!("Geocoding error: {}", e);
                Vec::new()
            }
        }
    }

    fn reverse(&self, at: LatLon) -> Option<GeocodingResult> {
        match self.try_reverse(at) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!("Reverse geocoding error: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for NominatimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimClient")
            .field("config", &self.config)
            .finish()
    }
}

fn fetch(request: ureq::Request) -> Result<String, GeocodingError> {
    match request.call() {
        Ok(response) => response.into_string().map_err(|e| GeocodingError::Decode {
            reason: e.to_string(),
        }),
        Err(ureq::Error::Status(status, response)) => Err(GeocodingError::Status {
            status,
            status_text: response.status_text().to_string(),
        }),
        Err(e) => Err(GeocodingError::Transport {
            reason: e.to_string(),
        }),
    }
}

fn decode_search(body: &str) -> Result<Vec<GeocodingResult>, GeocodingError> {
    serde_json::from_str(body).map_err(|e| GeocodingError::Decode {
        reason: e.to_string(),
    })
}

// Nominatim answers an unknown location with 200 and `{"error": ...}`,
// which fails to decode as a result.
fn decode_reverse(body: &str) -> Result<GeocodingResult, GeocodingError> {
    serde_json::from_str(body).map_err(|e| GeocodingError::Decode {
        reason: e.to_string(),
    })
}
