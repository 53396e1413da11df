//! Configuration management for certscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Command-line flags are merged on top by
//! the binary after loading.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/certscan/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Lookup service settings
    pub lookup: LookupConfig,
    /// Fetch pipeline settings
    pub scanning: ScanningConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Failure snapshot settings
    pub snapshots: SnapshotConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `CERTSCAN_BASE_URL`: Override the lookup service base URL
    /// - `CERTSCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `CERTSCAN_CONCURRENCY`: Override worker pool size
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CERTSCAN_BASE_URL") {
            if !val.is_empty() {
                tracing::debug!("Override lookup.base_url from env: {}", val);
                self.lookup.base_url = val;
            }
        }

        if let Ok(val) = std::env::var("CERTSCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("CERTSCAN_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.scanning.concurrency = concurrency;
                tracing::debug!("Override scanning.concurrency from env: {}", concurrency);
            }
        }
    }

    /// Check that every field holds a usable value.
    ///
    /// # Errors
    /// Returns the first offending field as `ConfigError::InvalidValue`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.timeout_ms".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_retries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.scanning.retry_base_delay_secs.is_finite()
            || self.scanning.retry_base_delay_secs < 0.0
        {
            return Err(ConfigError::InvalidValue {
                field: "scanning.retry_base_delay_secs".to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        if !self.scanning.rate_limit_secs.is_finite() || self.scanning.rate_limit_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.rate_limit_secs".to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        if !self.lookup.base_url.starts_with("http://")
            && !self.lookup.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "lookup.base_url".to_string(),
                reason: format!("must be an http(s) URL, got '{}'", self.lookup.base_url),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/certscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "certscan", "certscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Lookup service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the certificate lookup service
    pub base_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://acegrading.com".to_string(),
        }
    }
}

/// Fetch pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of concurrently active lookups
    pub concurrency: u32,
    /// Per-fetch content-ready timeout in milliseconds
    pub timeout_ms: u64,
    /// Total attempt budget per identifier
    pub max_retries: u32,
    /// Base delay for exponential backoff, in seconds
    pub retry_base_delay_secs: f64,
    /// Minimum spacing between fetch admissions across all workers, in seconds
    pub rate_limit_secs: f64,
    /// Settle delay after navigation before polling the page, in milliseconds
    pub settle_ms: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            timeout_ms: 15_000,
            max_retries: 3,
            retry_base_delay_secs: 2.0,
            rate_limit_secs: 1.0,
            settle_ms: 1500,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode (the lookup site's bot challenge
    /// frequently rejects headless sessions, so this defaults off)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

/// Failure snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Directory receiving one raw-markup file per exhausted identifier
    pub dir: PathBuf,
    /// Settle delay after the diagnostic navigation, in milliseconds
    pub settle_ms: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("debug_snapshots"),
            settle_ms: 2000,
        }
    }
}
