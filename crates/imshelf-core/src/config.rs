//! Configuration for imshelf
//!
//! Loaded from TOML; every section and field is optional:
//!
//! ```toml
//! [api]
//! base_url = "https://www.googleapis.com/books/v1"
//! api_key = "..."
//! browse_topics = ["bestseller", "romance"]
//!
//! [session]
//! page_size = 20
//! debounce_ms = 600
//!
//! [cache]
//! dir = "/tmp/imshelf"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest page the provider serves
pub const MAX_PAGE_SIZE: u32 = 40;

/// Environment variable that overrides `api.api_key`
pub const API_KEY_ENV: &str = "IMSHELF_API_KEY";

/// Topics picked at random for Browse mode
pub const DEFAULT_BROWSE_TOPICS: &[&str] = &[
    "bestseller",
    "fiction bestseller 2024",
    "romance",
    "fantasia",
    "ficção científica",
    "autoajuda",
    "biografia",
    "história",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
}

/// Remote catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the volumes API
    pub base_url: String,
    /// Optional provider API key, appended as `key=`
    pub api_key: Option<String>,
    pub user_agent: String,
    /// Request timeout; unset means no timeout beyond the transport's
    pub timeout_secs: Option<u64>,
    pub browse_topics: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            api_key: None,
            user_agent: "imshelf/1.0".to_string(),
            timeout_secs: None,
            browse_topics: DEFAULT_BROWSE_TOPICS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Session paging and debounce settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Results requested per page
    pub page_size: u32,
    /// Quiescence window before a typed query is fetched
    pub debounce_ms: u64,
    /// Quiescence window before suggestions are fetched
    pub suggestion_debounce_ms: u64,
    /// Maximum suggestions shown
    pub suggestion_limit: usize,
    /// Results requested per suggestion lookup
    pub suggestion_page_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            debounce_ms: 600,
            suggestion_debounce_ms: 300,
            suggestion_limit: 8,
            suggestion_page_size: 10,
        }
    }
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

/// Local cache settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory; defaults to the platform cache dir
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Configured directory, else `<platform cache dir>/imshelf`
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("imshelf")))
    }
}

impl ShelfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (currently the API key)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = Some(key);
            }
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let session = &self.session;
        if session.page_size == 0 || session.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if session.suggestion_page_size == 0 || session.suggestion_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "suggestion_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if session.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be positive".to_string(),
            ));
        }

        if self.api.browse_topics.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "browse_topics must contain at least one topic".to_string(),
            ));
        }

        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::Invalid(format!(
                "base_url is not a valid URL: {}",
                self.api.base_url
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShelfConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.page_size, 20);
        assert_eq!(config.session.debounce(), Duration::from_millis(600));
        assert_eq!(config.api.browse_topics.len(), 8);
    }

    #[test]
    fn test_partial_toml() {
        let config = ShelfConfig::from_toml(
            r#"
            [session]
            page_size = 10

            [cache]
            dir = "/tmp/imshelf-test"
            "#,
        )
        .unwrap();

        assert_eq!(config.session.page_size, 10);
        assert_eq!(config.session.debounce_ms, 600);
        assert_eq!(config.cache.resolve_dir(), Some(PathBuf::from("/tmp/imshelf-test")));
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = ShelfConfig::default();
        config.api.api_key = Some("secret".to_string());
        let parsed = ShelfConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_page_size_out_of_range() {
        let mut config = ShelfConfig::default();
        config.session.page_size = 41;
        assert!(config.validate().is_err());

        config.session.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_topics() {
        let mut config = ShelfConfig::default();
        config.api.browse_topics = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imshelf.toml");
        std::fs::write(&path, "[session]\ndebounce_ms = 250\n").unwrap();

        let config = ShelfConfig::load(&path).unwrap();
        assert_eq!(config.session.debounce_ms, 250);

        std::fs::write(&path, "[session]\npage_size = 500\n").unwrap();
        assert!(matches!(
            ShelfConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
