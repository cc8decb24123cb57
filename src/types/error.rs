//! Error types for the spot engine.
//!
//! The clustering, scoring and projection functions are total and never
//! return these. They surface only at the store, config, snapshot and CLI
//! boundaries.

use thiserror::Error;

/// All errors that can occur around the spot engine.
#[derive(Error, Debug)]
pub enum SpotError {
    /// Post ID is empty.
    #[error("Post ID must not be empty")]
    EmptyPostId,

    /// Latitude or longitude is NaN or infinite.
    #[error("Post {id} has non-finite coordinates ({latitude}, {longitude})")]
    NonFiniteCoordinates {
        id: String,
        latitude: f64,
        longitude: f64,
    },

    /// Expiry does not come after creation.
    #[error("Post {id} expires at {expires_at} which is not after creation at {created_at}")]
    InvalidLifetime {
        id: String,
        created_at: u64,
        expires_at: u64,
    },

    /// Post not found by ID.
    #[error("Post {0} not found")]
    PostNotFound(String),

    /// A post with this ID already exists.
    #[error("Post {0} already exists")]
    DuplicatePost(String),

    /// Unknown sort mode name.
    #[error("Unknown sort mode: {0}")]
    InvalidSortMode(String),

    /// A reference point could not be parsed.
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot JSON could not be parsed or produced.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Config TOML could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience result type for spot engine operations.
pub type SpotResult<T> = Result<T, SpotError>;
