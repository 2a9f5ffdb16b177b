//! Response recommendation engine
//!
//! Ranks available units against a threat report. Every unit starts at
//! [`defaults::BASE_SCORE`](crate::config::defaults::BASE_SCORE) and then:
//!
//! | Term | Effect |
//! |------|--------|
//! | Distance | loses up to `distance_weight`, linear out to `response_radius_km` |
//! | Engaged | `-engaged_penalty` |
//! | Ammo < critical fraction | `-ammo_critical_penalty` |
//! | Ammo < low fraction | `-ammo_low_penalty` |
//! | Capability matches a threat keyword | `+capability_bonus` (may exceed 100) |
//!
//! The result is clamped at 0 from below only. Weather and terrain do not
//! touch the score; they feed the time-to-intercept estimate.

use tracing::debug;

use super::mobility::{time_to_intercept_minutes, MobilityModel, WeatherFactor};
use crate::config::defaults::BASE_SCORE;
use crate::config::{MobilityConfig, RecommendationConfig};
use crate::geo;
use crate::types::{GeoPoint, Recommendation, ThreatReport, Unit, UnitStatus};
use crate::weather::{weather_or_neutral, WeatherProvider};

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    cfg: RecommendationConfig,
    mobility: MobilityModel,
}

impl RecommendationEngine {
    pub const fn new(cfg: RecommendationConfig, mobility: MobilityConfig) -> Self {
        Self {
            cfg,
            mobility: MobilityModel::new(mobility),
        }
    }

    /// Top `max_results` recommendations for `threat`, best first.
    ///
    /// Units that are neither operational nor engaged, and units without a
    /// position, are skipped. A threat without a position yields nothing.
    /// Ties keep candidate order.
    pub fn recommend(
        &self,
        threat: &ThreatReport,
        candidates: &[Unit],
        weather: &dyn WeatherProvider,
    ) -> Vec<Recommendation> {
        let Some(threat_pos) = threat.position.as_ref() else {
            debug!(threat_id = %threat.id, "Threat has no position, nothing to recommend");
            return Vec::new();
        };

        let mut recommendations: Vec<Recommendation> = candidates
            .iter()
            .filter(|u| u.status.is_available())
            .filter_map(|unit| {
                let pos = unit.position.as_ref()?;
                Some(self.evaluate(unit, pos, threat_pos, &threat.keywords, weather))
            })
            .collect();

        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations.truncate(self.cfg.max_results);
        recommendations
    }

    fn evaluate(
        &self,
        unit: &Unit,
        unit_pos: &GeoPoint,
        threat_pos: &GeoPoint,
        keywords: &[String],
        weather: &dyn WeatherProvider,
    ) -> Recommendation {
        let cfg = &self.cfg;
        let distance = geo::distance_km(Some(unit_pos), Some(threat_pos));
        let mut reasoning: Vec<String> = Vec::new();

        let mut score = BASE_SCORE - self.distance_penalty(distance);
        reasoning.push(format!("Distance: {distance:.2} km."));

        match unit.status {
            UnitStatus::Operational => reasoning.push("Unit fully operational.".to_string()),
            UnitStatus::Engaged => {
                score -= cfg.engaged_penalty;
                reasoning.push("Unit currently engaged (reduced availability).".to_string());
            }
            _ => {}
        }

        if let Some(ammo) = unit.ammo_fraction {
            if ammo < cfg.ammo_critical_fraction {
                score -= cfg.ammo_critical_penalty;
                reasoning.push(format!(
                    "Critical ammunition level ({:.0}%).",
                    (ammo * 100.0).round()
                ));
            } else if ammo < cfg.ammo_low_fraction {
                score -= cfg.ammo_low_penalty;
                reasoning.push("Medium ammunition level.".to_string());
            }
        }

        if unit.matches_any_keyword(keywords) {
            score += cfg.capability_bonus;
            reasoning.push("Unit capability matches the threat.".to_string());
        }

        let conditions = weather_or_neutral(weather, unit_pos.lat, unit_pos.lon);
        let mobility = self.mobility.assess(&conditions, unit_pos.lat);
        match mobility.weather {
            WeatherFactor::Adverse => reasoning.push(format!(
                "Mobility reduced by weather ({}).",
                conditions.condition
            )),
            WeatherFactor::Cloudy => {
                reasoning.push("Mobility slightly reduced by cloud cover.".to_string());
            }
            WeatherFactor::None => {}
        }
        if mobility.rugged_terrain {
            reasoning.push("Rugged terrain detected.".to_string());
        }

        let eta = time_to_intercept_minutes(distance, mobility.speed_kmh);
        if eta.is_none() {
            reasoning.push("Unit cannot reach the threat under current conditions.".to_string());
        }

        Recommendation {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            reasoning: reasoning.join(" "),
            score: score.max(0.0),
            time_to_intercept_minutes: eta,
        }
    }

    /// Points lost to distance: 0 at the threat, the whole weight at or
    /// beyond the response radius.
    fn distance_penalty(&self, distance_km: f64) -> f64 {
        let w = self.cfg.distance_weight;
        let kept = (w * (1.0 - distance_km / self.cfg.response_radius_km)).max(0.0);
        w - kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UnitCategory, WeatherInfo};
    use crate::weather::{FixedWeather, NeutralWeather};

    fn threat_at(lat: f64, lon: f64, keywords: &[&str]) -> ThreatReport {
        ThreatReport {
            id: "T1".to_string(),
            title: "armored column".to_string(),
            position: Some(GeoPoint::new(lat, lon)),
            keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
            event_timestamp: 0,
            report_timestamp: 0,
        }
    }

    fn unit_at(id: &str, lat: f64, lon: f64, status: UnitStatus, ammo: Option<f64>) -> Unit {
        Unit {
            id: id.to_string(),
            name: format!("Unit {id}"),
            category: UnitCategory::Company,
            position: Some(GeoPoint::new(lat, lon)),
            status,
            capabilities: vec!["infantry".to_string()],
            ammo_fraction: ammo,
            days_of_supply: None,
        }
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::default()
    }

    #[test]
    fn colocated_operational_unit_scores_100_engaged_90() {
        let threat = threat_at(4.60, -74.08, &["armor"]);
        let units = vec![
            unit_at("A", 4.60, -74.08, UnitStatus::Operational, Some(0.8)),
            unit_at("B", 4.60, -74.08, UnitStatus::Engaged, Some(0.8)),
        ];
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].unit_id, "A");
        assert!((recs[0].score - 100.0).abs() < 1e-9);
        assert!((recs[1].score - 90.0).abs() < 1e-9);
        assert!(recs[0].reasoning.contains("Distance: 0.00 km."));
        assert!(recs[1].reasoning.contains("engaged"));
        assert_eq!(recs[0].time_to_intercept_minutes, Some(0.0));
    }

    #[test]
    fn unit_beyond_radius_loses_full_distance_weight() {
        let threat = threat_at(4.60, -74.08, &[]);
        // ~111 km north
        let units = vec![unit_at("far", 5.60, -74.08, UnitStatus::Operational, None)];
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        assert!((recs[0].score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn unit_exactly_at_response_radius_keeps_no_distance_points() {
        let threat = threat_at(4.60, -74.08, &[]);
        let unit = unit_at("edge", 5.00, -74.08, UnitStatus::Operational, None);
        let cfg = RecommendationConfig {
            response_radius_km: geo::distance_km(threat.position.as_ref(), unit.position.as_ref()),
            ..RecommendationConfig::default()
        };
        let engine = RecommendationEngine::new(cfg, MobilityConfig::default());
        let recs = engine.recommend(&threat, &[unit], &NeutralWeather);
        assert_eq!(recs[0].score, 60.0);
    }

    #[test]
    fn fifty_km_out_scores_sixty() {
        let threat = threat_at(4.60, -74.08, &[]);
        // 50 km due north at 6371 km earth radius
        let north = 4.60 + (50.0 / 6371.0_f64).to_degrees();
        let units = vec![unit_at("edge", north, -74.08, UnitStatus::Operational, None)];
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        assert!((recs[0].score - 60.0).abs() < 1e-6, "score {}", recs[0].score);
        assert!(recs[0].reasoning.contains("Distance: 50.00 km."));
    }

    #[test]
    fn ammo_penalties_and_capability_bonus() {
        let threat = threat_at(4.60, -74.08, &["Infantry"]);
        let units = vec![
            unit_at("crit", 4.60, -74.08, UnitStatus::Operational, Some(0.25)),
            unit_at("low", 4.60, -74.08, UnitStatus::Operational, Some(0.5)),
        ];
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        // 100 - 5 + 10 and 100 - 15 + 10
        assert_eq!(recs[0].unit_id, "low");
        assert!((recs[0].score - 105.0).abs() < 1e-9);
        assert!((recs[1].score - 95.0).abs() < 1e-9);
        assert!(recs[1].reasoning.contains("Critical ammunition level (25%)."));
        assert!(recs[0].reasoning.contains("Medium ammunition level."));
        assert!(recs[0].reasoning.contains("capability matches"));
    }

    #[test]
    fn score_clamped_at_zero() {
        let cfg = RecommendationConfig {
            engaged_penalty: 200.0,
            ..RecommendationConfig::default()
        };
        let engine = RecommendationEngine::new(cfg, MobilityConfig::default());
        let threat = threat_at(4.60, -74.08, &[]);
        let units = vec![unit_at("X", 9.0, -74.08, UnitStatus::Engaged, Some(0.1))];
        let recs = engine.recommend(&threat, &units, &NeutralWeather);
        assert_eq!(recs[0].score, 0.0);
    }

    #[test]
    fn unavailable_and_unpositioned_units_skipped() {
        let threat = threat_at(4.60, -74.08, &[]);
        let mut ghost = unit_at("ghost", 0.0, 0.0, UnitStatus::Operational, None);
        ghost.position = None;
        let units = vec![
            unit_at("maint", 4.60, -74.08, UnitStatus::Maintenance, None),
            ghost,
            unit_at("ok", 4.61, -74.08, UnitStatus::Operational, None),
        ];
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].unit_id, "ok");
    }

    #[test]
    fn threat_without_position_yields_nothing() {
        let mut threat = threat_at(0.0, 0.0, &[]);
        threat.position = None;
        let units = vec![unit_at("A", 4.6, -74.0, UnitStatus::Operational, None)];
        assert!(engine().recommend(&threat, &units, &NeutralWeather).is_empty());
    }

    #[test]
    fn capped_at_five_sorted_descending_stable_ties() {
        let threat = threat_at(4.60, -74.08, &[]);
        let units: Vec<Unit> = (0..8)
            .map(|i| unit_at(&format!("U{i}"), 4.60, -74.08, UnitStatus::Operational, None))
            .collect();
        let recs = engine().recommend(&threat, &units, &NeutralWeather);
        assert_eq!(recs.len(), 5);
        let ids: Vec<_> = recs.iter().map(|r| r.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["U0", "U1", "U2", "U3", "U4"]);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn weather_and_terrain_only_affect_intercept_time() {
        let threat = threat_at(7.00, -74.08, &[]);
        // ~11.1 km south of the threat, outside the open-terrain band
        let units = vec![unit_at("A", 6.90, -74.08, UnitStatus::Operational, None)];
        let storm = FixedWeather::new(WeatherInfo::from_readings(15.0, 95.0, 45.0, "Storm"));

        let clear = engine().recommend(&threat, &units, &NeutralWeather);
        let stormy = engine().recommend(&threat, &units, &storm);
        assert!((clear[0].score - stormy[0].score).abs() < 1e-9);

        let t_clear = clear[0].time_to_intercept_minutes.unwrap();
        let t_storm = stormy[0].time_to_intercept_minutes.unwrap();
        assert!((t_storm / t_clear - 1.0 / 0.6).abs() < 1e-9);
        assert!(stormy[0].reasoning.contains("Mobility reduced by weather (Storm)."));
        assert!(stormy[0].reasoning.contains("Rugged terrain detected."));
    }

    #[test]
    fn zero_speed_reports_unreachable() {
        let mobility = MobilityConfig {
            base_speed_kmh: 0.0,
            ..MobilityConfig::default()
        };
        let engine = RecommendationEngine::new(RecommendationConfig::default(), mobility);
        let threat = threat_at(4.60, -74.08, &[]);
        let units = vec![unit_at("A", 4.65, -74.08, UnitStatus::Operational, None)];
        let recs = engine.recommend(&threat, &units, &NeutralWeather);
        assert_eq!(recs[0].time_to_intercept_minutes, None);
        assert!(recs[0].reasoning.contains("cannot reach"));
    }
}
