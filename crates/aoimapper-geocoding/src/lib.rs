//! # AOI Mapper Geocoding
//!
//! Free-text location search against a Nominatim service.
//!
//! Search is best effort: any failure is logged and surfaces as an empty
//! result list, never as an error in the drawing core.

pub mod client;
pub mod debounce;
pub mod result;

pub use client::{Geocoder, NominatimClient, NominatimConfig};
pub use debounce::SearchDebouncer;
pub use result::GeocodingResult;
