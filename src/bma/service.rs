//! BMA service layer
//!
//! Binds the engines to the stores and the weather provider. Every method
//! is synchronous; async callers (API handlers, the scheduler) run them in
//! `spawn_blocking`.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::alert_gate::AlertGate;
use super::hotspot::{HotspotDetector, HotspotScan};
use super::logistics::{build_resupply_request, nearest_support_unit, LogisticsForecaster};
use super::recommendation::RecommendationEngine;
use crate::config::defaults::MS_PER_HOUR;
use crate::config::BmaConfig;
use crate::storage::{StorageError, Stores};
use crate::types::{LogisticsForecast, LogisticsRequest, Recommendation, Unit};
use crate::weather::WeatherProvider;

#[derive(Debug, thiserror::Error)]
pub enum BmaError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Start of a window of `hours` ending at `now_ms`.
pub fn window_start_ms(now_ms: i64, hours: u64) -> i64 {
    let span = i64::try_from(hours)
        .unwrap_or(i64::MAX)
        .saturating_mul(MS_PER_HOUR);
    now_ms.saturating_sub(span)
}

pub struct BmaService {
    stores: Stores,
    weather: Arc<dyn WeatherProvider>,
    config: BmaConfig,
    recommender: RecommendationEngine,
    forecaster: LogisticsForecaster,
    detector: HotspotDetector,
    gate: AlertGate,
    /// Serializes detection passes (scheduled and on-demand)
    pass_lock: Mutex<()>,
}

impl BmaService {
    pub fn new(stores: Stores, weather: Arc<dyn WeatherProvider>, config: BmaConfig) -> Self {
        Self {
            recommender: RecommendationEngine::new(
                config.recommendation.clone(),
                config.mobility.clone(),
            ),
            forecaster: LogisticsForecaster::new(config.logistics.clone()),
            detector: HotspotDetector::new(config.hotspot.clone()),
            gate: AlertGate::new(),
            pass_lock: Mutex::new(()),
            stores,
            weather,
            config,
        }
    }

    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    pub const fn config(&self) -> &BmaConfig {
        &self.config
    }

    pub fn weather_provider(&self) -> &dyn WeatherProvider {
        self.weather.as_ref()
    }

    /// Ranked responders for a stored threat report. Unknown ids yield an empty list.
    pub fn recommend_for_threat(&self, threat_id: &str) -> Result<Vec<Recommendation>, BmaError> {
        let Some(threat) = self.stores.intel.get_report(threat_id)? else {
            debug!(threat_id, "Unknown threat report");
            return Ok(Vec::new());
        };
        let candidates: Vec<Unit> = self
            .stores
            .units
            .list_units()?
            .into_iter()
            .filter(|u| u.status.is_available())
            .collect();

        Ok(self
            .recommender
            .recommend(&threat, &candidates, self.weather.as_ref()))
    }

    pub fn predict_logistics(&self) -> Result<Vec<LogisticsForecast>, BmaError> {
        let units = self.stores.units.list_units()?;
        Ok(self.forecaster.forecast(&units))
    }

    /// Detection pass over the default window ending now.
    pub fn identify_hotspots(&self) -> Result<HotspotScan, BmaError> {
        self.identify_hotspots_at(now_ms())
    }

    /// Detection pass over the default window ending at `now_ms`.
    pub fn identify_hotspots_at(&self, now_ms: i64) -> Result<HotspotScan, BmaError> {
        let since = window_start_ms(now_ms, self.config.hotspot.default_window_hours);
        self.identify_hotspots_for_period(since, now_ms)
    }

    /// Detection pass over reports with `event_timestamp >= since_ms`.
    ///
    /// Passes never overlap: a call made while another is running waits for it.
    pub fn identify_hotspots_for_period(
        &self,
        since_ms: i64,
        now_ms: i64,
    ) -> Result<HotspotScan, BmaError> {
        let _pass = self
            .pass_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let reports = self.stores.intel.list_reports_since(since_ms)?;
        let units = self.stores.units.list_units()?;
        let scan = self.detector.detect(
            &reports,
            &units,
            self.stores.alerts.as_ref(),
            &self.gate,
            now_ms,
        );

        if !scan.hotspots.is_empty() {
            info!(
                reports = reports.len(),
                hotspots = scan.hotspots.len(),
                alerts = scan.alerts_created.len(),
                suppressed = scan.suppressed,
                failures = scan.failures.len(),
                "Hotspot pass complete"
            );
        }
        Ok(scan)
    }

    /// Submit a resupply request for `unit_id`; `None` if the unit is unknown.
    pub fn request_resupply(&self, unit_id: &str) -> Result<Option<LogisticsRequest>, BmaError> {
        self.request_resupply_at(unit_id, now_ms())
    }

    pub fn request_resupply_at(
        &self,
        unit_id: &str,
        now_ms: i64,
    ) -> Result<Option<LogisticsRequest>, BmaError> {
        let Some(unit) = self.stores.units.get_unit(unit_id)? else {
            return Ok(None);
        };
        let roster = self.stores.units.list_units()?;
        let support = nearest_support_unit(&unit, &roster).map(|(u, _)| u);

        let request = build_resupply_request(&unit, support, now_ms);
        let stored = self.stores.logistics.submit_resupply_request(request)?;
        info!(
            unit_id = %stored.originating_unit_id,
            request_id = %stored.id,
            support = support.map(|s| s.name.as_str()).unwrap_or("none"),
            "Resupply request submitted"
        );
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::types::{GeoPoint, ThreatReport, UnitCategory, UnitStatus};
    use crate::weather::NeutralWeather;

    const NOW: i64 = 1_710_072_000_000;

    fn unit(id: &str, category: UnitCategory, lat: f64) -> Unit {
        Unit {
            id: id.to_string(),
            name: format!("Unit {id}"),
            category,
            position: Some(GeoPoint::new(lat, -74.0)),
            status: UnitStatus::Operational,
            capabilities: Vec::new(),
            ammo_fraction: None,
            days_of_supply: Some(1.0),
        }
    }

    fn report(id: &str, lat: f64, event_ts: i64) -> ThreatReport {
        ThreatReport {
            id: id.to_string(),
            title: String::new(),
            position: Some(GeoPoint::new(lat, -74.0)),
            keywords: Vec::new(),
            event_timestamp: event_ts,
            report_timestamp: event_ts,
        }
    }

    fn service(units: Vec<Unit>, reports: Vec<ThreatReport>) -> BmaService {
        let store = Arc::new(InMemoryStore::with_snapshot(units, reports));
        BmaService::new(
            Stores::from_backend(store),
            Arc::new(NeutralWeather),
            BmaConfig::default(),
        )
    }

    #[test]
    fn window_start_handles_huge_spans() {
        assert_eq!(window_start_ms(NOW, 24), NOW - 24 * MS_PER_HOUR);
        assert_eq!(window_start_ms(0, u64::MAX), -i64::MAX);
    }

    #[test]
    fn unknown_threat_gives_empty_recommendations() {
        let svc = service(vec![unit("a", UnitCategory::Company, 4.0)], Vec::new());
        assert!(svc.recommend_for_threat("nope").unwrap().is_empty());
    }

    #[test]
    fn default_window_excludes_old_reports() {
        let day = 24 * MS_PER_HOUR;
        let reports = vec![
            report("r1", 4.0, NOW - 1_000),
            report("r2", 4.001, NOW - 2_000),
            report("old", 4.002, NOW - day - 1),
        ];
        let svc = service(Vec::new(), reports);
        assert!(svc.identify_hotspots_at(NOW).unwrap().hotspots.is_empty());

        let wide = svc
            .identify_hotspots_for_period(window_start_ms(NOW, 48), NOW)
            .unwrap();
        assert_eq!(wide.hotspots[0].intensity, 3);
    }

    #[test]
    fn resupply_request_persisted_with_support_name() {
        let svc = service(
            vec![
                unit("co", UnitCategory::Company, 4.0),
                unit("bn", UnitCategory::Battalion, 4.2),
            ],
            Vec::new(),
        );
        let req = svc.request_resupply_at("co", NOW).unwrap().unwrap();
        assert!(req.details.ends_with("Recommended support unit: Unit bn"));
        assert_eq!(svc.stores().logistics.list_requests().unwrap(), vec![req]);
        assert!(svc.request_resupply_at("ghost", NOW).unwrap().is_none());
    }
}
