//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use airsight_core::CURRENT_LOCATION_LABEL;
use airsight_core::open_meteo::{AIR_QUALITY_URL, GEOCODING_URL, OpenMeteoConfig, WEATHER_URL};
use airsight_types::Coordinate;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoints and request options
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Position used for "current location"
    #[serde(default)]
    pub location: LocationConfig,

    /// Alert delivery
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Local state database
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,

    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Language for place names
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Request current weather alongside air quality
    #[serde(default = "default_true")]
    pub weather_enabled: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            air_quality_url: default_air_quality_url(),
            weather_url: default_weather_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            weather_enabled: true,
        }
    }
}

/// Fixed device position. Without one, location permission is denied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Display name for this position
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            label: default_label(),
        }
    }
}

/// Alert delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Raise a desktop notification (when built with desktop notifications)
    #[serde(default = "default_true")]
    pub desktop_notifications: bool,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            desktop_notifications: true,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file (defaults to the platform data directory)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_geocoding_url() -> String {
    GEOCODING_URL.to_string()
}

fn default_air_quality_url() -> String {
    AIR_QUALITY_URL.to_string()
}

fn default_weather_url() -> String {
    WEATHER_URL.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_label() -> String {
    CURRENT_LOCATION_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airsight")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`; missing or malformed files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to parse config"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to read config"),
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Adapter settings for the Open-Meteo client.
    pub fn open_meteo(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            geocoding_url: self.providers.geocoding_url.clone(),
            air_quality_url: self.providers.air_quality_url.clone(),
            weather_url: self.providers.weather_url.clone(),
            language: self.providers.language.clone(),
            timeout: Duration::from_secs(self.providers.timeout_secs),
        }
    }

    /// Database path: explicit flag, then config, then platform default.
    pub fn db_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.storage.path.clone())
            .unwrap_or_else(airsight_store::default_db_path)
    }
}

/// Resolve the device position from flags, falling back to config.
///
/// Returns `None` when no position is configured.
pub fn resolve_position(
    lat: Option<f64>,
    lon: Option<f64>,
    config: &Config,
) -> Result<Option<Coordinate>> {
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, None) => match (config.location.latitude, config.location.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, None) => return Ok(None),
            _ => bail!("[location] needs both latitude and longitude"),
        },
        _ => bail!("--lat and --lon must be given together"),
    };
    let coordinate = Coordinate::new(lat, lon).context("Invalid position")?;
    Ok(Some(coordinate))
}
