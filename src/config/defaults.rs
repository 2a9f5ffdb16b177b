//! System-wide default constants.
//!
//! Grouped by subsystem. These seed the `Default` impls in `bma_config.rs`;
//! code that needs a tunable value reads it from the config, not from here.

// ============================================================================
// Mobility
// ============================================================================

/// Cross-country movement speed for a unit with no adverse factors (km/h).
pub const BASE_SPEED_KMH: f64 = 25.0;

/// Speed multiplier when the weather provider flags operational impact.
pub const ADVERSE_WEATHER_FACTOR: f64 = 0.6;

/// Speed multiplier for a "cloudy" condition without operational impact.
pub const CLOUDY_FACTOR: f64 = 0.85;

/// Speed multiplier outside the open-terrain latitude band.
pub const RUGGED_TERRAIN_FACTOR: f64 = 0.8;

/// Open-terrain latitude band (degrees). Outside it terrain counts as rugged.
pub const TERRAIN_BAND_MIN_LAT: f64 = 2.0;
pub const TERRAIN_BAND_MAX_LAT: f64 = 6.0;

// ============================================================================
// Recommendation scoring
// ============================================================================

pub const BASE_SCORE: f64 = 100.0;

/// Distance at which a unit has lost the whole distance budget (km).
pub const RESPONSE_RADIUS_KM: f64 = 50.0;

/// Points available for proximity.
pub const DISTANCE_WEIGHT: f64 = 40.0;

pub const ENGAGED_PENALTY: f64 = 10.0;

pub const AMMO_CRITICAL_FRACTION: f64 = 0.30;
pub const AMMO_CRITICAL_PENALTY: f64 = 15.0;
pub const AMMO_LOW_FRACTION: f64 = 0.60;
pub const AMMO_LOW_PENALTY: f64 = 5.0;

pub const CAPABILITY_BONUS: f64 = 10.0;

pub const MAX_RECOMMENDATIONS: usize = 5;

// ============================================================================
// Logistics
// ============================================================================

/// Units below this many days of supply are forecast.
pub const LOW_SUPPLY_DAYS: f64 = 7.0;

/// Units below this many days of supply are CRITICAL.
pub const CRITICAL_SUPPLY_DAYS: f64 = 2.0;

// ============================================================================
// Hotspots
// ============================================================================

pub const CLUSTER_RADIUS_KM: f64 = 5.0;

/// Minimum reports in a cluster for it to count as a hotspot.
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Default detection window (hours).
pub const DEFAULT_WINDOW_HOURS: u64 = 24;

/// Default window for the historical hotspot query (hours).
pub const HISTORICAL_WINDOW_HOURS: u64 = 48;

/// Interval between scheduled hotspot scans (seconds).
pub const HOTSPOT_SCAN_INTERVAL_SECS: u64 = 300;

// ============================================================================
// Time
// ============================================================================

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

// ============================================================================
// Storage / server
// ============================================================================

pub const DATA_DIR: &str = "./data";
pub const SERVER_ADDR: &str = "0.0.0.0:8080";
