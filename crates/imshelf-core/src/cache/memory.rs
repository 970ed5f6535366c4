//! In-memory cache store

use std::collections::HashMap;
use std::sync::RwLock;

use super::{validate_key, CacheStore};
use crate::error::CacheError;

/// Process-local store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError> {
        validate_key(key)?;
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .remove(key);
        Ok(())
    }
}
