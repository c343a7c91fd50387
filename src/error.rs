//! Error types for feature index construction and configuration.
//!
//! Querying never fails: absent tile data yields an empty result and layers
//! missing from the active set are skipped.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FeatureIndexError>;

#[derive(Debug, Error)]
pub enum FeatureIndexError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A coordinate cannot be represented in the tile's i16 domain.
    #[error("coordinate ({x}, {y}) is outside the tile coordinate range")]
    CoordinateOutOfRange { x: i64, y: i64 },
}
