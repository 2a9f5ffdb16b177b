//! Weather provider seam
//!
//! The analytics core never talks to a weather API directly. It asks a
//! [`WeatherProvider`] and, through [`weather_or_neutral`], turns any
//! provider failure into mild no-impact weather so a provider outage never
//! fails a recommendation.

use tracing::warn;

use crate::config::{WeatherConfig, WeatherMode};
use crate::types::WeatherInfo;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather provider unavailable: {0}")]
    Unavailable(String),
    #[error("invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Source of current weather at a coordinate.
///
/// Implementations must be thread-safe; one provider is shared by every
/// analytics call.
pub trait WeatherProvider: Send + Sync {
    fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherInfo, WeatherError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}

/// Query `provider`, substituting [`WeatherInfo::neutral`] on any failure.
pub fn weather_or_neutral(provider: &dyn WeatherProvider, lat: f64, lon: f64) -> WeatherInfo {
    match provider.current_weather(lat, lon) {
        Ok(w) => w,
        Err(e) => {
            warn!(
                provider = provider.provider_name(),
                lat,
                lon,
                error = %e,
                "Weather lookup failed, using neutral default"
            );
            WeatherInfo::neutral()
        }
    }
}

/// Always answers with neutral weather.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralWeather;

impl WeatherProvider for NeutralWeather {
    fn current_weather(&self, _lat: f64, _lon: f64) -> Result<WeatherInfo, WeatherError> {
        Ok(WeatherInfo::neutral())
    }

    fn provider_name(&self) -> &'static str {
        "neutral"
    }
}

/// Same operator-configured reading everywhere in the theatre.
#[derive(Debug, Clone)]
pub struct FixedWeather {
    reading: WeatherInfo,
}

impl FixedWeather {
    pub const fn new(reading: WeatherInfo) -> Self {
        Self { reading }
    }
}

impl WeatherProvider for FixedWeather {
    fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherInfo, WeatherError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }
        Ok(self.reading.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

/// Build the provider selected by the `[weather]` config section.
pub fn provider_from_config(cfg: &WeatherConfig) -> Box<dyn WeatherProvider> {
    match cfg.mode {
        WeatherMode::Neutral => Box::new(NeutralWeather),
        WeatherMode::Fixed => Box::new(FixedWeather::new(WeatherInfo::from_readings(
            cfg.temperature_c,
            cfg.humidity_percent,
            cfg.wind_speed_kmh,
            cfg.condition.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Outage;

    impl WeatherProvider for Outage {
        fn current_weather(&self, _lat: f64, _lon: f64) -> Result<WeatherInfo, WeatherError> {
            Err(WeatherError::Unavailable("connection refused".to_string()))
        }

        fn provider_name(&self) -> &'static str {
            "outage"
        }
    }

    #[test]
    fn outage_degrades_to_neutral() {
        let w = weather_or_neutral(&Outage, 4.6, -74.0);
        assert_eq!(w, WeatherInfo::neutral());
    }

    #[test]
    fn fixed_provider_rejects_bad_coordinates_and_falls_back() {
        let storm = FixedWeather::new(WeatherInfo::from_readings(15.0, 95.0, 40.0, "storm"));
        assert!(storm.current_weather(4.6, -74.0).unwrap().operational_impact);
        let w = weather_or_neutral(&storm, 120.0, 0.0);
        assert!(!w.operational_impact);
    }

    #[test]
    fn config_selects_provider() {
        let cfg = WeatherConfig {
            mode: WeatherMode::Fixed,
            condition: "Cloudy".to_string(),
            ..WeatherConfig::default()
        };
        let p = provider_from_config(&cfg);
        assert_eq!(p.provider_name(), "fixed");
        assert_eq!(p.current_weather(0.0, 0.0).unwrap().condition, "Cloudy");
        assert_eq!(provider_from_config(&WeatherConfig::default()).provider_name(), "neutral");
    }
}
