use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::PlatformSettings;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Page size used when draining paginated endpoints
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Fan-out limit for per-competitor fetches during aggregation
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    #[serde(default)]
    pub output_dir: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u64 {
    100
}

fn default_fetch_concurrency() -> usize {
    4
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            fetch_concurrency: default_fetch_concurrency(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Get config directory path (~/.competia/)
    pub fn config_dir() -> Result<PathBuf> {
        // Test environments override the directory
        if let Ok(dir) = std::env::var("COMPETIA_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".competia"))
    }

    /// Get config file path (~/.competia/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let config_file = Self::config_file()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Check if user is authenticated
    pub fn is_authenticated(&self) -> bool {
        !self.auth.token.is_empty()
    }

    /// Update auth tokens
    pub fn set_tokens(&mut self, token: String, refresh_token: String) {
        self.auth.token = token;
        self.auth.refresh_token = refresh_token;
    }

    /// Clear auth tokens
    pub fn clear_tokens(&mut self) {
        self.auth.token.clear();
        self.auth.refresh_token.clear();
    }
}

/// Platform branding cached on disk with an explicit invalidation timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsCache {
    pub settings: PlatformSettings,
    pub fetched_at: DateTime<Utc>,
}

/// Cached settings older than this are refetched
const SETTINGS_TTL_MINUTES: i64 = 5;

impl SettingsCache {
    pub fn new(settings: PlatformSettings) -> Self {
        Self {
            settings,
            fetched_at: Utc::now(),
        }
    }

    fn cache_file() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("settings_cache.json"))
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < Duration::minutes(SETTINGS_TTL_MINUTES)
    }

    /// Load the cached settings if present and still within the freshness window
    pub fn load_fresh() -> Option<PlatformSettings> {
        let path = Self::cache_file().ok()?;
        let contents = fs::read_to_string(path).ok()?;
        let cache: SettingsCache = serde_json::from_str(&contents).ok()?;

        if cache.is_fresh(Utc::now()) {
            tracing::debug!("Using cached platform settings");
            Some(cache.settings)
        } else {
            tracing::debug!("Platform settings cache is stale");
            None
        }
    }

    /// Persist freshly fetched settings
    pub fn store(settings: &PlatformSettings) -> Result<()> {
        let config_dir = Config::config_dir()?;
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let cache = SettingsCache::new(settings.clone());
        let contents =
            serde_json::to_string_pretty(&cache).context("Failed to serialize settings cache")?;

        fs::write(Self::cache_file()?, contents).context("Failed to write settings cache")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.reports.page_size, 100);
        assert_eq!(config.reports.fetch_concurrency, 4);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.api.base_url, deserialized.api.base_url);
        assert_eq!(config.reports.page_size, deserialized.reports.page_size);
    }

    #[test]
    fn test_token_lifecycle() {
        let mut config = Config::default();
        assert!(!config.is_authenticated());

        config.set_tokens("access".to_string(), "refresh".to_string());
        assert!(config.is_authenticated());

        config.clear_tokens();
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_settings_cache_freshness() {
        let cache = SettingsCache::new(PlatformSettings::default());
        assert!(cache.is_fresh(Utc::now()));
        assert!(!cache.is_fresh(Utc::now() + Duration::minutes(6)));

        // Exactly at the boundary counts as stale
        assert!(!cache.is_fresh(cache.fetched_at + Duration::minutes(5)));
    }
}
