//! Config Validation Tests
//!
//! Typo detection (unknown keys with suggestions) and range validation of
//! `BmaConfig`, exercised independently from the rest of the service.

use std::io::Write;

use bma_engine::config::validation::{suggest_correction, validate_unknown_keys, KNOWN_CONFIG_KEYS};
use bma_engine::config::{BmaConfig, ConfigError, StorageBackend, WeatherMode};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_hotspot_key_warns_with_suggestion() {
    let toml_str = r#"
[hotspot]
cluster_radius_kn = 4.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "hotspot.cluster_radius_kn");
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("hotspot.cluster_radius_km")
    );
    assert!(warnings[0].to_string().contains("did you mean"));
}

#[test]
fn misspelled_section_warns() {
    let warnings = validate_unknown_keys("[mobilty]\nbase_speed_kmh = 20.0\n");
    let fields: Vec<_> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert!(fields.contains(&"mobilty"));
    assert!(fields.contains(&"mobilty.base_speed_kmh"));
    assert_eq!(suggest_correction("mobilty").as_deref(), Some("mobility"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[storage]
data_dir = "/var/lib/bma"
backend = "sled"

[mobility]
base_speed_kmh = 30.0
cloudy_factor = 0.9

[recommendation]
max_results = 3

[logistics]
low_supply_days = 5.0
critical_supply_days = 1.0

[hotspot]
scheduler_enabled = false

[weather]
mode = "fixed"
condition = "rain"
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

#[test]
fn far_off_key_gets_no_suggestion() {
    let warnings = validate_unknown_keys("completely_unrelated_setting = 1\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn every_default_key_is_known() {
    let text = BmaConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&text);
    assert!(warnings.is_empty(), "{warnings:?}");
    assert!(KNOWN_CONFIG_KEYS.contains(&"hotspot.scan_interval_secs"));
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn zero_cluster_radius_rejected() {
    let mut cfg = BmaConfig::default();
    cfg.hotspot.cluster_radius_km = 0.0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("hotspot.cluster_radius_km"));
}

#[test]
fn inverted_ammo_fractions_rejected() {
    let mut cfg = BmaConfig::default();
    cfg.recommendation.ammo_critical_fraction = 0.7;
    assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn speed_factor_above_one_rejected() {
    let mut cfg = BmaConfig::default();
    cfg.mobility.adverse_weather_factor = 1.2;
    assert!(cfg.validate().is_err());
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_applies_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[storage]\nbackend = \"memory\"\n\n[weather]\nmode = \"fixed\"\nwind_speed_kmh = 45.0\n"
    )
    .unwrap();

    let cfg = BmaConfig::load_from_file(file.path()).unwrap();
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.weather.mode, WeatherMode::Fixed);
    assert_eq!(cfg.weather.wind_speed_kmh, 45.0);
    assert_eq!(cfg.hotspot.min_cluster_size, 3);
}

#[test]
fn invalid_values_in_file_fail_loading() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logistics]\nlow_supply_days = 1.0\ncritical_supply_days = 2.0\n").unwrap();
    assert!(matches!(
        BmaConfig::load_from_file(file.path()),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[hotspot\nmin_cluster_size = ").unwrap();
    assert!(matches!(
        BmaConfig::load_from_file(file.path()),
        Err(ConfigError::Parse(..))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::path::Path::new("/definitely/not/here/bma_config.toml");
    assert!(matches!(
        BmaConfig::load_from_file(path),
        Err(ConfigError::Io(..))
    ));
}
