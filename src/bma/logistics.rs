//! Supply-days forecaster and resupply request builder.

use crate::config::LogisticsConfig;
use crate::geo;
use crate::types::{LogisticsForecast, LogisticsRequest, RequestStatus, SupplySeverity, Unit};

const URGENT_RESUPPLY: &str = "Schedule urgent resupply.";
const AUTO_REQUEST_DETAILS: &str =
    "Automatic request generated by BMA. Urgent resupply of ammunition and supplies required.";

#[derive(Debug, Clone, Default)]
pub struct LogisticsForecaster {
    cfg: LogisticsConfig,
}

impl LogisticsForecaster {
    pub const fn new(cfg: LogisticsConfig) -> Self {
        Self { cfg }
    }

    /// Forecast every unit below the low-supply threshold, most urgent first.
    ///
    /// `units` is the full roster: it is both the set being forecast and the
    /// pool of support units.
    pub fn forecast(&self, units: &[Unit]) -> Vec<LogisticsForecast> {
        let mut forecasts: Vec<LogisticsForecast> = units
            .iter()
            .filter_map(|unit| {
                let days = unit.days_of_supply?;
                (days < self.cfg.low_supply_days).then(|| self.forecast_unit(unit, days, units))
            })
            .collect();

        forecasts.sort_by(|a, b| a.days_remaining.total_cmp(&b.days_remaining));
        forecasts
    }

    fn forecast_unit(&self, unit: &Unit, days: f64, roster: &[Unit]) -> LogisticsForecast {
        let severity = if days < self.cfg.critical_supply_days {
            SupplySeverity::Critical
        } else {
            SupplySeverity::Low
        };

        let recommendation = match nearest_support_unit(unit, roster) {
            Some((support, distance)) => {
                format!("Resupply from {} ({:.0} km).", support.name, distance.round())
            }
            None => URGENT_RESUPPLY.to_string(),
        };

        LogisticsForecast {
            unit_id: unit.id.clone(),
            unit_name: unit.name.clone(),
            days_remaining: days,
            severity,
            recommendation,
        }
    }
}

/// Closest battalion/brigade to `unit`, excluding itself, with its distance in km.
///
/// Units without a position on either side never qualify. Ties keep roster order.
pub fn nearest_support_unit<'a>(unit: &Unit, roster: &'a [Unit]) -> Option<(&'a Unit, f64)> {
    roster
        .iter()
        .filter(|u| u.category.is_support_echelon() && u.id != unit.id)
        .map(|u| (u, geo::distance_km(unit.position.as_ref(), u.position.as_ref())))
        .filter(|(_, d)| d.is_finite())
        .fold(None, |best: Option<(&Unit, f64)>, cand| match best {
            Some((_, best_d)) if best_d <= cand.1 => best,
            _ => Some(cand),
        })
}

/// Pending resupply request for `unit`, naming `support` when known.
pub fn build_resupply_request(
    unit: &Unit,
    support: Option<&Unit>,
    now_ms: i64,
) -> LogisticsRequest {
    let mut details = AUTO_REQUEST_DETAILS.to_string();
    if let Some(support) = support {
        details.push_str(" Recommended support unit: ");
        details.push_str(&support.name);
    }

    LogisticsRequest {
        id: uuid::Uuid::new_v4().to_string(),
        originating_unit_id: unit.id.clone(),
        originating_unit_name: unit.name.clone(),
        details,
        request_timestamp: now_ms,
        status: RequestStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoPoint, UnitCategory, UnitStatus};

    fn unit(id: &str, category: UnitCategory, lat: f64, days: Option<f64>) -> Unit {
        Unit {
            id: id.to_string(),
            name: format!("Unit {id}"),
            category,
            position: Some(GeoPoint::new(lat, -74.0)),
            status: UnitStatus::Operational,
            capabilities: Vec::new(),
            ammo_fraction: None,
            days_of_supply: days,
        }
    }

    #[test]
    fn severity_thresholds_and_exclusion() {
        let units = vec![
            unit("crit", UnitCategory::Company, 4.0, Some(1.5)),
            unit("low", UnitCategory::Company, 4.0, Some(5.0)),
            unit("fine", UnitCategory::Company, 4.0, Some(10.0)),
            unit("edge", UnitCategory::Company, 4.0, Some(7.0)),
            unit("unknown", UnitCategory::Company, 4.0, None),
        ];
        let out = LogisticsForecaster::default().forecast(&units);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].unit_id, "crit");
        assert_eq!(out[0].severity, SupplySeverity::Critical);
        assert_eq!(out[1].unit_id, "low");
        assert_eq!(out[1].severity, SupplySeverity::Low);
    }

    #[test]
    fn sorted_most_urgent_first() {
        let units = vec![
            unit("a", UnitCategory::Company, 4.0, Some(6.0)),
            unit("b", UnitCategory::Company, 4.0, Some(0.5)),
            unit("c", UnitCategory::Company, 4.0, Some(3.0)),
        ];
        let days: Vec<f64> = LogisticsForecaster::default()
            .forecast(&units)
            .iter()
            .map(|f| f.days_remaining)
            .collect();
        assert_eq!(days, vec![0.5, 3.0, 6.0]);
    }

    #[test]
    fn names_nearest_support_unit_with_rounded_distance() {
        let units = vec![
            unit("co", UnitCategory::Company, 4.0, Some(1.0)),
            unit("bde", UnitCategory::Brigade, 4.5, None),
            unit("bn", UnitCategory::Battalion, 4.1, None),
            unit("plt", UnitCategory::Platoon, 4.01, None),
        ];
        let out = LogisticsForecaster::default().forecast(&units);
        // 0.1 degree of latitude is ~11.1 km
        assert_eq!(out[0].recommendation, "Resupply from Unit bn (11 km).");
    }

    #[test]
    fn support_unit_never_resupplies_itself() {
        let units = vec![unit("bn", UnitCategory::Battalion, 4.0, Some(3.0))];
        let out = LogisticsForecaster::default().forecast(&units);
        assert_eq!(out[0].recommendation, URGENT_RESUPPLY);
        assert!(nearest_support_unit(&units[0], &units).is_none());
    }

    #[test]
    fn unpositioned_unit_gets_generic_message() {
        let mut lost = unit("co", UnitCategory::Company, 0.0, Some(3.0));
        lost.position = None;
        let units = vec![lost, unit("bn", UnitCategory::Battalion, 4.0, None)];
        let out = LogisticsForecaster::default().forecast(&units);
        assert_eq!(out[0].recommendation, URGENT_RESUPPLY);
    }

    #[test]
    fn resupply_request_details() {
        let co = unit("co", UnitCategory::Company, 4.0, Some(1.0));
        let bn = unit("bn", UnitCategory::Battalion, 4.1, None);

        let with_support = build_resupply_request(&co, Some(&bn), 42);
        assert_eq!(with_support.originating_unit_id, "co");
        assert_eq!(with_support.request_timestamp, 42);
        assert_eq!(with_support.status, RequestStatus::Pending);
        assert!(with_support.details.starts_with(AUTO_REQUEST_DETAILS));
        assert!(with_support.details.ends_with(" Recommended support unit: Unit bn"));

        let without = build_resupply_request(&co, None, 42);
        assert_eq!(without.details, AUTO_REQUEST_DETAILS);
        assert_ne!(with_support.id, without.id);
    }
}
