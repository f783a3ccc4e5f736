//! Error types for EAGLE Lens

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EagleError {
    // Geocoding errors
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    #[error("Geocoder unavailable: {reason}")]
    GeocoderUnavailable { reason: String },

    // Analysis errors
    #[error("Analyzer unavailable: {reason}")]
    AnalyzerUnavailable { reason: String },

    // Inference errors
    #[error("Model artifact not found at {path}")]
    ModelUnavailable { path: PathBuf },

    #[error("Invalid model: {reason}")]
    ModelInvalid { reason: String },

    #[error("Invalid bounding box: {reason}")]
    InvalidBBox { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EagleError {
    /// Whether the message is safe to return verbatim to an API caller
    pub fn is_user_facing(&self) -> bool {
        matches!(self, EagleError::LocationNotFound { .. } | EagleError::InvalidBBox { .. })
    }
}

impl From<serde_json::Error> for EagleError {
    fn from(err: serde_json::Error) -> Self {
        EagleError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EagleError>;
