use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    board::{
        forecast::DEFAULT_FORECAST_URL,
        geocoding::{DEFAULT_GEOCODING_URL, SUGGEST_LIMIT},
    },
    model::Position,
};

/// Endpoints and timings of the weather board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub language: String,
    pub suggest_limit: usize,
    pub suggest_debounce_ms: u64,
    pub reverse_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "en".to_string(),
            suggest_limit: SUGGEST_LIMIT,
            suggest_debounce_ms: 200,
            reverse_timeout_ms: 5000,
            request_timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }

    pub fn reverse_timeout(&self) -> Duration {
        Duration::from_millis(self.reverse_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Optional home position used when no coordinates are given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl LocationConfig {
    pub fn home(&self) -> Option<Position> {
        Some(Position {
            lat: self.lat?,
            lon: self.lon?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    pub settle_ms: u64,
    pub reduced_motion: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3500,
            settle_ms: 360,
            reduced_motion: false,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// language = "de"
///
/// [location]
/// lat = 52.52
/// lon = 13.405
///
/// [carousel]
/// reduced_motion = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub location: LocationConfig,
    pub carousel: CarouselConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "landing", "landing")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the key/value file holding recent cities.
    pub fn store_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("store.json"))
    }

    pub fn set_home(&mut self, home: Option<Position>) {
        self.location = LocationConfig {
            lat: home.map(|p| p.lat),
            lon: home.map(|p| p.lon),
        };
    }
}
