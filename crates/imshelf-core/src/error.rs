//! Error types for imshelf-core

use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;

/// Message shown to users for any catalog failure
pub const CATALOG_UNAVAILABLE: &str = "Could not reach or search the catalog";

/// Failures of a remote catalog call
///
/// Undecodable response bodies are not errors; they count as zero results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Network unreachable or request failed before a response
    #[error("Catalog unreachable: {0}")]
    Transport(#[from] HttpError),

    /// Non-success status from the provider
    #[error("Catalog rejected the request: {status} {reason}")]
    Rejected { status: u16, reason: String },
}

impl CatalogError {
    /// Single user-facing category for transport and rejection failures
    pub fn user_message(&self) -> &'static str {
        CATALOG_UNAVAILABLE
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }
}

/// Local cache write failures (reads never fail, they miss)
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
