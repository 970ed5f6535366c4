//! Directory-backed cache store
//!
//! Each key is one `<key>.json` file. Writes go to a temporary sibling
//! first and are renamed into place so a crash never leaves half a value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{validate_key, CacheStore};
use crate::error::CacheError;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a cache directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        validate_key(key).ok()?;
        match fs::read_to_string(self.entry_path(key)) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(key, error = %e, "cache entry unreadable");
                None
            }
        }
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), CacheError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, value).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}
