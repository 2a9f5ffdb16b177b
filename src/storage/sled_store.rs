//! Sled-backed store
//!
//! One sled database with a named tree per collection. Keys are record ids,
//! values are JSON. Records that fail to deserialize are skipped with a
//! warning so one corrupt entry never hides the rest of a collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::{AlertStore, IntelStore, LogisticsRequestSink, StorageError, UnitStore};
use crate::types::{Alert, LogisticsRequest, ThreatReport, Unit};

const UNITS_TREE: &str = "units";
const REPORTS_TREE: &str = "reports";
const ALERTS_TREE: &str = "alerts";
const REQUESTS_TREE: &str = "logistics_requests";

#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
    units: sled::Tree,
    reports: sled::Tree,
    alerts: sled::Tree,
    requests: sled::Tree,
}

impl SledStore {
    /// Open or create the store at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        let store = Self {
            units: db.open_tree(UNITS_TREE)?,
            reports: db.open_tree(REPORTS_TREE)?,
            alerts: db.open_tree(ALERTS_TREE)?,
            requests: db.open_tree(REQUESTS_TREE)?,
            db: Arc::new(db),
        };
        tracing::info!(
            path = ?path_ref,
            units = store.units.len(),
            reports = store.reports.len(),
            alerts = store.alerts.len(),
            "BMA store opened"
        );
        Ok(store)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    /// Get database size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.db.size_on_disk().unwrap_or(0)
    }

    fn put<T: Serialize>(tree: &sled::Tree, id: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        tree.insert(id.as_bytes(), bytes)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, id: &str) -> Result<Option<T>, StorageError> {
        match tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn all<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<T>, StorageError> {
        let mut out = Vec::with_capacity(tree.len());
        for item in tree.iter() {
            let (key, value) = item?;
            match serde_json::from_slice::<T>(&value) {
                Ok(v) => out.push(v),
                Err(e) => tracing::warn!(
                    key = %String::from_utf8_lossy(&key),
                    error = %e,
                    "Skipping undecodable record"
                ),
            }
        }
        Ok(out)
    }
}

impl UnitStore for SledStore {
    /// Units in id order
    fn list_units(&self) -> Result<Vec<Unit>, StorageError> {
        Self::all(&self.units)
    }

    fn get_unit(&self, id: &str) -> Result<Option<Unit>, StorageError> {
        Self::get(&self.units, id)
    }

    fn upsert_unit(&self, unit: &Unit) -> Result<(), StorageError> {
        Self::put(&self.units, &unit.id, unit)
    }
}

impl IntelStore for SledStore {
    /// Reports ordered by `(event_timestamp, id)`.
    fn list_reports_since(&self, since_ms: i64) -> Result<Vec<ThreatReport>, StorageError> {
        let mut reports: Vec<ThreatReport> = Self::all::<ThreatReport>(&self.reports)?
            .into_iter()
            .filter(|r| r.event_timestamp >= since_ms)
            .collect();
        reports.sort_by(|a, b| {
            a.event_timestamp
                .cmp(&b.event_timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(reports)
    }

    fn get_report(&self, id: &str) -> Result<Option<ThreatReport>, StorageError> {
        Self::get(&self.reports, id)
    }

    fn upsert_report(&self, report: &ThreatReport) -> Result<(), StorageError> {
        Self::put(&self.reports, &report.id, report)
    }
}

impl AlertStore for SledStore {
    /// Alerts ordered by creation time
    fn list_alerts(&self) -> Result<Vec<Alert>, StorageError> {
        let mut alerts: Vec<Alert> = Self::all(&self.alerts)?;
        alerts.sort_by_key(|a| a.timestamp);
        Ok(alerts)
    }

    fn create_alert(&self, alert: Alert) -> Result<Alert, StorageError> {
        Self::put(&self.alerts, &alert.id, &alert)?;
        // Alerts gate future alerts, so they must survive a crash
        self.alerts.flush()?;
        Ok(alert)
    }

    fn acknowledge_alert(&self, id: &str) -> Result<Option<Alert>, StorageError> {
        let Some(mut alert) = Self::get::<Alert>(&self.alerts, id)? else {
            return Ok(None);
        };
        alert.acknowledged = true;
        Self::put(&self.alerts, id, &alert)?;
        Ok(Some(alert))
    }
}

impl LogisticsRequestSink for SledStore {
    fn submit_resupply_request(
        &self,
        request: LogisticsRequest,
    ) -> Result<LogisticsRequest, StorageError> {
        Self::put(&self.requests, &request.id, &request)?;
        Ok(request)
    }

    fn list_requests(&self) -> Result<Vec<LogisticsRequest>, StorageError> {
        let mut requests: Vec<LogisticsRequest> = Self::all(&self.requests)?;
        requests.sort_by_key(|r| r.request_timestamp);
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertSeverity, AlertType, GeoPoint, RequestStatus, UnitCategory, UnitStatus};

    fn report(id: &str, ts: i64) -> ThreatReport {
        ThreatReport {
            id: id.to_string(),
            title: "contact".to_string(),
            position: Some(GeoPoint::new(4.6, -74.0)),
            keywords: vec!["armor".to_string()],
            event_timestamp: ts,
            report_timestamp: ts,
        }
    }

    #[test]
    fn test_store_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(temp_dir.path()).unwrap();
        assert!(store.list_units().unwrap().is_empty());
        assert!(store.list_alerts().unwrap().is_empty());
    }

    #[test]
    fn test_units_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(temp_dir.path()).unwrap();
        let unit = Unit {
            id: "BN-1".to_string(),
            name: "1st Battalion".to_string(),
            category: UnitCategory::Battalion,
            position: Some(GeoPoint::new(4.0, -74.0)),
            status: UnitStatus::Operational,
            capabilities: vec!["logistics".to_string()],
            ammo_fraction: Some(0.9),
            days_of_supply: Some(12.0),
        };
        store.upsert_unit(&unit).unwrap();
        assert_eq!(store.get_unit("BN-1").unwrap(), Some(unit));
        assert_eq!(store.list_units().unwrap().len(), 1);
    }

    #[test]
    fn test_reports_sorted_by_event_time() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(temp_dir.path()).unwrap();
        store.upsert_report(&report("a", 300)).unwrap();
        store.upsert_report(&report("b", 100)).unwrap();
        store.upsert_report(&report("c", 200)).unwrap();

        let ids: Vec<_> = store
            .list_reports_since(150)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_alerts_persist_across_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let id = {
            let store = SledStore::open(temp_dir.path()).unwrap();
            let alert = store
                .create_alert(Alert::new(
                    AlertType::HotspotThreat,
                    Some("U1".to_string()),
                    AlertSeverity::High,
                    "in hotspot".to_string(),
                    1_000,
                    None,
                ))
                .unwrap();
            store.flush().unwrap();
            alert.id
        };

        let store = SledStore::open(temp_dir.path()).unwrap();
        let alerts = store.list_alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(!alerts[0].acknowledged);

        let acked = store.acknowledge_alert(&id).unwrap().unwrap();
        assert!(acked.acknowledged);
        assert!(store.list_alerts().unwrap()[0].acknowledged);
    }

    #[test]
    fn test_requests_listed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(temp_dir.path()).unwrap();
        store
            .submit_resupply_request(LogisticsRequest {
                id: "r1".to_string(),
                originating_unit_id: "U1".to_string(),
                originating_unit_name: "Alpha".to_string(),
                details: "ammo".to_string(),
                request_timestamp: 5,
                status: RequestStatus::Pending,
            })
            .unwrap();
        assert_eq!(store.list_requests().unwrap().len(), 1);
    }
}
