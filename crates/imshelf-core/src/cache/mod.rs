//! Local key-value cache for session state
//!
//! Values are stored as JSON strings. Reads never fail: a missing key or a
//! value that no longer decodes is a miss and yields the caller's default.
//! There is no expiry; entries live until removed.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Well-known keys written by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Books,
    Query,
    Page,
    Popular,
}

impl CacheKey {
    pub const ALL: [CacheKey; 4] = [
        CacheKey::Books,
        CacheKey::Query,
        CacheKey::Page,
        CacheKey::Popular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Books => "books-cache",
            CacheKey::Query => "query-cache",
            CacheKey::Page => "page-cache",
            CacheKey::Popular => "popular-cache",
        }
    }
}

/// Raw string storage
pub trait CacheStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Typed JSON access on top of any [`CacheStore`]
pub trait CacheStoreExt: CacheStore {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "unreadable cache entry, treating as miss");
                default
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, raw)
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}

/// Keys are used as file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<(), CacheError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let names: Vec<&str> = CacheKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["books-cache", "query-cache", "page-cache", "popular-cache"]
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("books-cache").is_ok());
        assert!(validate_key("page_2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
