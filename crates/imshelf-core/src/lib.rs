//! imshelf-core: book discovery core for the imshelf catalog browser
//!
//! This library provides the client-side result pipeline behind imshelf:
//! - Remote catalog access (search, popular browsing, lookup by id)
//! - Content-policy filtering and normalization of raw volumes
//! - Cover image URL optimization
//! - Local JSON key-value caching
//! - Debounced search-as-you-type with title suggestions
//! - The session controller that owns query, paging, and result state
//!
//! Presentation is left to the caller, which renders [`SessionSnapshot`]s
//! and forwards user intents to a [`CatalogSession`].

pub mod cache;
pub mod catalog;
pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod http;
pub mod image;
pub mod normalize;
pub mod schedule;
pub mod session;
pub mod suggest;

pub use cache::{CacheKey, CacheStore, CacheStoreExt, FileStore, MemoryStore};
pub use catalog::{CatalogClient, LookupOutcome, RemoteCatalog};
pub use config::{ApiConfig, CacheConfig, SessionConfig, ShelfConfig};
pub use domain::{CatalogRecord, ImageLinks, ImageSize, IndustryIdentifier, RawVolume};
pub use error::{CacheError, CatalogError, ConfigError};
pub use http::{HttpError, HttpResponse, HttpTransport, ReqwestTransport};
pub use image::{optimize, SizeHint};
pub use normalize::{admit, normalize, Rejection};
pub use session::{CatalogSession, Mode, Phase, SessionSnapshot};
pub use suggest::{Suggestion, SuggestionEngine};

/// Returns the version of imshelf-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
