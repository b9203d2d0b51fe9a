//! Error types for prop-scout

use thiserror::Error;

/// Main error type for prop-scout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    #[error("Position unavailable: {0}")]
    Position(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Ranking cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for prop-scout operations
pub type Result<T> = std::result::Result<T, Error>;
