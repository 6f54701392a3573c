//! Error handling for AOI Mapper
//!
//! The drawing state machine itself never fails: invalid pointer input is
//! absorbed as a no-op. Errors only arise at the edges of the system:
//! - Store errors (persisted state I/O and schema)
//! - Geocoding errors (the remote search collaborator)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Feature store persistence error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persisted state file could not be read or written
    #[error("Storage I/O error at {path}: {reason}")]
    Io {
        /// The storage file path.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// The persisted state is not valid JSON or does not match the schema
    #[error("Corrupted store: {reason}")]
    Corrupted {
        /// The reason the state could not be decoded.
        reason: String,
    },

    /// Serializing the state failed
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No storage directory could be resolved
    #[error("Storage directory unavailable: {0}")]
    NoStorageDirectory(String),
}

/// Geocoding collaborator error type
#[derive(Error, Debug, Clone)]
pub enum GeocodingError {
    /// The request did not reach the service
    #[error("Geocoding transport error: {reason}")]
    Transport {
        /// The transport failure.
        reason: String,
    },

    /// The service answered with a non-success status
    #[error("Geocoding API error: {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// HTTP status text.
        status_text: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode geocoding response: {reason}")]
    Decode {
        /// The decode failure.
        reason: String,
    },
}

/// Main error type for AOI Mapper
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Geocoding error
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a store error
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this is a geocoding error
    pub fn is_geocoding_error(&self) -> bool {
        matches!(self, Error::Geocoding(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
