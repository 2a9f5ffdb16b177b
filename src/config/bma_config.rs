//! BMA Configuration - engine constants as operator-tunable TOML values
//!
//! Each section implements `Default` with the values from `defaults.rs`,
//! so a missing file or a missing section changes nothing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a BMA deployment.
///
/// Load with `BmaConfig::load()` which searches:
/// 1. `$BMA_CONFIG` env var
/// 2. `./bma_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BmaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Speed model used for time-to-intercept
    #[serde(default)]
    pub mobility: MobilityConfig,

    /// Response recommendation scoring
    #[serde(default)]
    pub recommendation: RecommendationConfig,

    /// Supply exhaustion forecasting
    #[serde(default)]
    pub logistics: LogisticsConfig,

    /// Report clustering and hotspot alerting
    #[serde(default)]
    pub hotspot: HotspotConfig,

    /// Weather provider selection
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl BmaConfig {
    /// Load configuration using the standard search order:
    /// 1. `$BMA_CONFIG` environment variable
    /// 2. `./bma_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("BMA_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded BMA config from BMA_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from BMA_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "BMA_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./bma_config.toml
        let local = PathBuf::from("bma_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded BMA config from ./bma_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./bma_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No bma_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Unknown keys are warnings only
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - All numeric values must be finite
    /// - Speed multipliers must be in (0, 1]
    /// - Terrain band min must not exceed max
    /// - Critical supply threshold must not exceed the low-supply threshold
    /// - Radii, sizes and result limits must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let m = &self.mobility;
        Self::check_positive(m.base_speed_kmh, "mobility.base_speed_kmh", &mut errors);
        Self::check_factor(m.adverse_weather_factor, "mobility.adverse_weather_factor", &mut errors);
        Self::check_factor(m.cloudy_factor, "mobility.cloudy_factor", &mut errors);
        Self::check_factor(m.rugged_terrain_factor, "mobility.rugged_terrain_factor", &mut errors);
        if !m.terrain_band_min_lat.is_finite() || !m.terrain_band_max_lat.is_finite() {
            errors.push("mobility.terrain_band: values must be finite".to_string());
        } else if m.terrain_band_min_lat > m.terrain_band_max_lat {
            errors.push(format!(
                "mobility.terrain_band_min_lat ({:.3}) must be <= terrain_band_max_lat ({:.3})",
                m.terrain_band_min_lat, m.terrain_band_max_lat
            ));
        }

        let r = &self.recommendation;
        Self::check_positive(r.response_radius_km, "recommendation.response_radius_km", &mut errors);
        for (v, name) in [
            (r.distance_weight, "recommendation.distance_weight"),
            (r.engaged_penalty, "recommendation.engaged_penalty"),
            (r.ammo_critical_penalty, "recommendation.ammo_critical_penalty"),
            (r.ammo_low_penalty, "recommendation.ammo_low_penalty"),
            (r.capability_bonus, "recommendation.capability_bonus"),
        ] {
            Self::check_non_negative(v, name, &mut errors);
        }
        if r.ammo_critical_fraction > r.ammo_low_fraction {
            errors.push(format!(
                "recommendation.ammo_critical_fraction ({:.2}) must be <= ammo_low_fraction ({:.2})",
                r.ammo_critical_fraction, r.ammo_low_fraction
            ));
        }
        if r.max_results == 0 {
            errors.push("recommendation.max_results must be > 0".to_string());
        }

        let l = &self.logistics;
        Self::check_positive(l.low_supply_days, "logistics.low_supply_days", &mut errors);
        Self::check_positive(l.critical_supply_days, "logistics.critical_supply_days", &mut errors);
        if l.critical_supply_days > l.low_supply_days {
            errors.push(format!(
                "logistics.critical_supply_days ({:.1}) must be <= low_supply_days ({:.1})",
                l.critical_supply_days, l.low_supply_days
            ));
        }

        let h = &self.hotspot;
        Self::check_positive(h.cluster_radius_km, "hotspot.cluster_radius_km", &mut errors);
        if h.min_cluster_size < 2 {
            errors.push(format!(
                "hotspot.min_cluster_size must be >= 2 (got {})",
                h.min_cluster_size
            ));
        }
        if h.default_window_hours == 0 || h.historical_window_hours == 0 {
            errors.push("hotspot window hours must be > 0".to_string());
        }
        if h.scan_interval_secs == 0 {
            errors.push("hotspot.scan_interval_secs must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, catch them explicitly
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name}: must be a finite value > 0 (got {value})"));
        }
    }

    fn check_non_negative(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{name}: must be a finite value >= 0 (got {value})"));
        }
    }

    fn check_factor(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            errors.push(format!("{name}: must be in (0, 1] (got {value})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({path}): {err}", path = .0.display(), err = .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({path}): {err}", path = .0.display(), err = .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed:\n  - {list}", list = .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server / Storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `BMA_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sled,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub backend: StorageBackend,
}

fn default_data_dir() -> String {
    defaults::DATA_DIR.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::default(),
        }
    }
}

// ============================================================================
// Engine sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityConfig {
    pub base_speed_kmh: f64,
    pub adverse_weather_factor: f64,
    pub cloudy_factor: f64,
    pub rugged_terrain_factor: f64,
    pub terrain_band_min_lat: f64,
    pub terrain_band_max_lat: f64,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            base_speed_kmh: defaults::BASE_SPEED_KMH,
            adverse_weather_factor: defaults::ADVERSE_WEATHER_FACTOR,
            cloudy_factor: defaults::CLOUDY_FACTOR,
            rugged_terrain_factor: defaults::RUGGED_TERRAIN_FACTOR,
            terrain_band_min_lat: defaults::TERRAIN_BAND_MIN_LAT,
            terrain_band_max_lat: defaults::TERRAIN_BAND_MAX_LAT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub response_radius_km: f64,
    pub distance_weight: f64,
    pub engaged_penalty: f64,
    pub ammo_critical_fraction: f64,
    pub ammo_critical_penalty: f64,
    pub ammo_low_fraction: f64,
    pub ammo_low_penalty: f64,
    pub capability_bonus: f64,
    pub max_results: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            response_radius_km: defaults::RESPONSE_RADIUS_KM,
            distance_weight: defaults::DISTANCE_WEIGHT,
            engaged_penalty: defaults::ENGAGED_PENALTY,
            ammo_critical_fraction: defaults::AMMO_CRITICAL_FRACTION,
            ammo_critical_penalty: defaults::AMMO_CRITICAL_PENALTY,
            ammo_low_fraction: defaults::AMMO_LOW_FRACTION,
            ammo_low_penalty: defaults::AMMO_LOW_PENALTY,
            capability_bonus: defaults::CAPABILITY_BONUS,
            max_results: defaults::MAX_RECOMMENDATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsConfig {
    pub low_supply_days: f64,
    pub critical_supply_days: f64,
}

impl Default for LogisticsConfig {
    fn default() -> Self {
        Self {
            low_supply_days: defaults::LOW_SUPPLY_DAYS,
            critical_supply_days: defaults::CRITICAL_SUPPLY_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotConfig {
    pub cluster_radius_km: f64,
    pub min_cluster_size: usize,
    pub default_window_hours: u64,
    pub historical_window_hours: u64,
    pub scan_interval_secs: u64,
    pub scheduler_enabled: bool,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            cluster_radius_km: defaults::CLUSTER_RADIUS_KM,
            min_cluster_size: defaults::MIN_CLUSTER_SIZE,
            default_window_hours: defaults::DEFAULT_WINDOW_HOURS,
            historical_window_hours: defaults::HISTORICAL_WINDOW_HOURS,
            scan_interval_secs: defaults::HOTSPOT_SCAN_INTERVAL_SECS,
            scheduler_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherMode {
    /// Mild no-impact weather everywhere
    #[default]
    Neutral,
    /// One operator-supplied reading for the whole theatre
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub mode: WeatherMode,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    pub condition: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            mode: WeatherMode::Neutral,
            temperature_c: 20.0,
            humidity_percent: 50.0,
            wind_speed_kmh: 10.0,
            condition: "clear".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
