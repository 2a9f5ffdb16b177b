//! Current weather at a position, as reported by a [`crate::weather::WeatherProvider`].

use serde::{Deserialize, Serialize};

/// Humidity above which operations are impacted (%).
pub const IMPACT_HUMIDITY_PERCENT: f64 = 85.0;
/// Wind speed above which operations are impacted (km/h).
pub const IMPACT_WIND_KMH: f64 = 30.0;
/// Temperature above which operations are impacted (°C).
pub const IMPACT_MAX_TEMP_C: f64 = 35.0;
/// Temperature below which operations are impacted (°C).
pub const IMPACT_MIN_TEMP_C: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    /// Free-text condition label ("clear", "cloudy", "heavy rain", ...)
    pub condition: String,
    /// Provider-assessed operational impact
    pub operational_impact: bool,
}

impl WeatherInfo {
    /// Build a reading and derive `operational_impact` from the thresholds.
    pub fn from_readings(
        temperature_c: f64,
        humidity_percent: f64,
        wind_speed_kmh: f64,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            temperature_c,
            humidity_percent,
            wind_speed_kmh,
            condition: condition.into(),
            operational_impact: Self::assess_impact(
                temperature_c,
                humidity_percent,
                wind_speed_kmh,
            ),
        }
    }

    pub fn assess_impact(temperature_c: f64, humidity_percent: f64, wind_speed_kmh: f64) -> bool {
        humidity_percent > IMPACT_HUMIDITY_PERCENT
            || wind_speed_kmh > IMPACT_WIND_KMH
            || temperature_c > IMPACT_MAX_TEMP_C
            || temperature_c < IMPACT_MIN_TEMP_C
    }

    /// Mild, no-impact weather used whenever the provider cannot answer.
    pub fn neutral() -> Self {
        Self {
            temperature_c: 20.0,
            humidity_percent: 50.0,
            wind_speed_kmh: 10.0,
            condition: "unavailable".to_string(),
            operational_impact: false,
        }
    }
}

impl Default for WeatherInfo {
    fn default() -> Self {
        Self::neutral()
    }
}
