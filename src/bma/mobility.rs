//! Cross-country mobility model
//!
//! Effective speed = base speed × weather factor × terrain factor. The
//! factors are independent scalars, so application order is irrelevant.

use serde::Serialize;

use crate::config::MobilityConfig;
use crate::types::WeatherInfo;

/// Weather multiplier that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherFactor {
    /// Provider flagged operational impact
    Adverse,
    /// Overcast, no operational impact
    Cloudy,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilityAssessment {
    pub speed_kmh: f64,
    pub weather: WeatherFactor,
    pub rugged_terrain: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MobilityModel {
    cfg: MobilityConfig,
}

impl MobilityModel {
    pub const fn new(cfg: MobilityConfig) -> Self {
        Self { cfg }
    }

    pub const fn config(&self) -> &MobilityConfig {
        &self.cfg
    }

    /// Effective speed (km/h, >= 0) from an explicit base speed.
    ///
    /// An unrecognised `condition` label applies no weather multiplier.
    pub fn effective_speed_kmh(
        &self,
        base_speed_kmh: f64,
        condition: &str,
        adverse_weather: bool,
        latitude: f64,
    ) -> f64 {
        self.assess_with_base(base_speed_kmh, condition, adverse_weather, latitude)
            .speed_kmh
    }

    /// Assessment at the configured base speed for a weather reading.
    pub fn assess(&self, weather: &WeatherInfo, latitude: f64) -> MobilityAssessment {
        self.assess_with_base(
            self.cfg.base_speed_kmh,
            &weather.condition,
            weather.operational_impact,
            latitude,
        )
    }

    fn assess_with_base(
        &self,
        base_speed_kmh: f64,
        condition: &str,
        adverse_weather: bool,
        latitude: f64,
    ) -> MobilityAssessment {
        let mut speed = if base_speed_kmh.is_finite() {
            base_speed_kmh.max(0.0)
        } else {
            0.0
        };

        let weather = if adverse_weather {
            speed *= self.cfg.adverse_weather_factor;
            WeatherFactor::Adverse
        } else if condition.trim().eq_ignore_ascii_case("cloudy") {
            speed *= self.cfg.cloudy_factor;
            WeatherFactor::Cloudy
        } else {
            WeatherFactor::None
        };

        let rugged_terrain = !(self.cfg.terrain_band_min_lat..=self.cfg.terrain_band_max_lat)
            .contains(&latitude);
        if rugged_terrain {
            speed *= self.cfg.rugged_terrain_factor;
        }

        MobilityAssessment {
            speed_kmh: speed.max(0.0),
            weather,
            rugged_terrain,
        }
    }
}

/// Minutes to cover `distance_km` at `speed_kmh`.
///
/// `None` means unreachable: zero, negative or non-finite speed, or a
/// non-finite distance.
pub fn time_to_intercept_minutes(distance_km: f64, speed_kmh: f64) -> Option<f64> {
    if !distance_km.is_finite() || !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return None;
    }
    Some((distance_km.max(0.0) / speed_kmh) * 60.0)
}
