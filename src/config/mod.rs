//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/castle-feed/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::feed::FeedSettings;
use crate::geo::Coordinates;
use crate::location::FallbackAnchor;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog service settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Feed controller settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Fallback anchor used when no position can be acquired
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Place search settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Catalog service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fixed page size for catalog requests
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Feed controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Cache validity radius in kilometers
    #[serde(default = "default_cache_radius")]
    pub cache_radius_km: f64,

    /// Delay before a silent enrichment re-poll, in seconds
    #[serde(default = "default_repoll_delay")]
    pub repoll_delay_secs: u64,

    /// Silent re-poll attempts per load
    #[serde(default = "default_repoll_attempts")]
    pub repoll_max_attempts: u32,
}

/// Fallback anchor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fallback_lat")]
    pub latitude: f64,

    #[serde(default = "default_fallback_lon")]
    pub longitude: f64,

    #[serde(default = "default_fallback_label")]
    pub label: String,
}

/// Place search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Suggestion limit per search
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// ISO alpha-2 country codes place search is restricted to;
    /// empty disables the filter
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_cache_radius() -> f64 {
    DEFAULT_CACHE_RADIUS_KM
}
fn default_repoll_delay() -> u64 {
    DEFAULT_REPOLL_DELAY_SECS
}
fn default_repoll_attempts() -> u32 {
    DEFAULT_REPOLL_MAX_ATTEMPTS
}
fn default_fallback_lat() -> f64 {
    DEFAULT_FALLBACK_LAT
}
fn default_fallback_lon() -> f64 {
    DEFAULT_FALLBACK_LON
}
fn default_fallback_label() -> String {
    DEFAULT_FALLBACK_LABEL.to_string()
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_allowed_countries() -> Vec<String> {
    DEFAULT_ALLOWED_COUNTRIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}

// Implement Default traits
impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            feed: FeedConfig::default(),
            fallback: FallbackConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cache_radius_km: default_cache_radius(),
            repoll_delay_secs: default_repoll_delay(),
            repoll_max_attempts: default_repoll_attempts(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            latitude: default_fallback_lat(),
            longitude: default_fallback_lon(),
            label: default_fallback_label(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            allowed_countries: default_allowed_countries(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Feed controller settings derived from this config
    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            page_size: self.catalog.page_size,
            repoll_delay: Duration::from_secs(self.feed.repoll_delay_secs),
            repoll_max_attempts: self.feed.repoll_max_attempts,
        }
    }

    /// Fallback anchor derived from this config
    pub fn fallback_anchor(&self) -> FallbackAnchor {
        FallbackAnchor {
            coords: Coordinates::new(self.fallback.latitude, self.fallback.longitude),
            label: self.fallback.label.clone(),
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["catalog", "base_url"] => Some(self.catalog.base_url.clone()),
            ["catalog", "page_size"] => Some(self.catalog.page_size.to_string()),
            ["catalog", "timeout_secs"] => Some(self.catalog.timeout_secs.to_string()),

            ["feed", "cache_radius_km"] => Some(self.feed.cache_radius_km.to_string()),
            ["feed", "repoll_delay_secs"] => Some(self.feed.repoll_delay_secs.to_string()),
            ["feed", "repoll_max_attempts"] => Some(self.feed.repoll_max_attempts.to_string()),

            ["fallback", "latitude"] => Some(self.fallback.latitude.to_string()),
            ["fallback", "longitude"] => Some(self.fallback.longitude.to_string()),
            ["fallback", "label"] => Some(self.fallback.label.clone()),

            ["search", "limit"] => Some(self.search.limit.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["catalog", "base_url"] => {
                self.catalog.base_url = value.to_string();
            }
            ["catalog", "page_size"] => {
                self.catalog.page_size = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid page size: {}", value)))?;
            }
            ["catalog", "timeout_secs"] => {
                self.catalog.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout: {}", value)))?;
            }
            ["feed", "cache_radius_km"] => {
                self.feed.cache_radius_km = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid radius: {}", value)))?;
            }
            ["feed", "repoll_delay_secs"] => {
                self.feed.repoll_delay_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid delay: {}", value)))?;
            }
            ["feed", "repoll_max_attempts"] => {
                self.feed.repoll_max_attempts = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid attempt count: {}", value)))?;
            }
            ["fallback", "latitude"] => {
                self.fallback.latitude = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid latitude: {}", value)))?;
            }
            ["fallback", "longitude"] => {
                self.fallback.longitude = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid longitude: {}", value)))?;
            }
            ["fallback", "label"] => {
                self.fallback.label = value.to_string();
            }
            ["search", "limit"] => {
                self.search.limit = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid limit: {}", value)))?;
            }
            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all settable config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "catalog.base_url",
            "catalog.page_size",
            "catalog.timeout_secs",
            "feed.cache_radius_km",
            "feed.repoll_delay_secs",
            "feed.repoll_max_attempts",
            "fallback.latitude",
            "fallback.longitude",
            "fallback.label",
            "search.limit",
        ]
    }
}
