//! In-memory store for tests and minimal deployments
//!
//! Thread-safe via `RwLock`. Not durable: data is lost on restart.
//! Collections keep insertion order; upserts replace in place. Alerts are
//! retained until restart, like the sled backend.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{AlertStore, IntelStore, LogisticsRequestSink, StorageError, UnitStore};
use crate::types::{Alert, LogisticsRequest, ThreatReport, Unit};

#[derive(Default)]
pub struct InMemoryStore {
    units: RwLock<Vec<Unit>>,
    reports: RwLock<Vec<ThreatReport>>,
    alerts: RwLock<Vec<Alert>>,
    requests: RwLock<Vec<LogisticsRequest>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StorageError> {
    lock.read().map_err(|e| StorageError::Poisoned(e.to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StorageError> {
    lock.write().map_err(|e| StorageError::Poisoned(e.to_string()))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with_snapshot(units: Vec<Unit>, reports: Vec<ThreatReport>) -> Self {
        Self {
            units: RwLock::new(units),
            reports: RwLock::new(reports),
            ..Self::default()
        }
    }
}

impl UnitStore for InMemoryStore {
    fn list_units(&self) -> Result<Vec<Unit>, StorageError> {
        Ok(read(&self.units)?.clone())
    }

    fn get_unit(&self, id: &str) -> Result<Option<Unit>, StorageError> {
        Ok(read(&self.units)?.iter().find(|u| u.id == id).cloned())
    }

    fn upsert_unit(&self, unit: &Unit) -> Result<(), StorageError> {
        let mut units = write(&self.units)?;
        match units.iter_mut().find(|u| u.id == unit.id) {
            Some(existing) => *existing = unit.clone(),
            None => units.push(unit.clone()),
        }
        Ok(())
    }
}

impl IntelStore for InMemoryStore {
    fn list_reports_since(&self, since_ms: i64) -> Result<Vec<ThreatReport>, StorageError> {
        Ok(read(&self.reports)?
            .iter()
            .filter(|r| r.event_timestamp >= since_ms)
            .cloned()
            .collect())
    }

    fn get_report(&self, id: &str) -> Result<Option<ThreatReport>, StorageError> {
        Ok(read(&self.reports)?.iter().find(|r| r.id == id).cloned())
    }

    fn upsert_report(&self, report: &ThreatReport) -> Result<(), StorageError> {
        let mut reports = write(&self.reports)?;
        match reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => *existing = report.clone(),
            None => reports.push(report.clone()),
        }
        Ok(())
    }
}

impl AlertStore for InMemoryStore {
    fn list_alerts(&self) -> Result<Vec<Alert>, StorageError> {
        Ok(read(&self.alerts)?.clone())
    }

    fn create_alert(&self, alert: Alert) -> Result<Alert, StorageError> {
        write(&self.alerts)?.push(alert.clone());
        Ok(alert)
    }

    fn acknowledge_alert(&self, id: &str) -> Result<Option<Alert>, StorageError> {
        let mut alerts = write(&self.alerts)?;
        Ok(alerts.iter_mut().find(|a| a.id == id).map(|a| {
            a.acknowledged = true;
            a.clone()
        }))
    }
}

impl LogisticsRequestSink for InMemoryStore {
    fn submit_resupply_request(
        &self,
        request: LogisticsRequest,
    ) -> Result<LogisticsRequest, StorageError> {
        write(&self.requests)?.push(request.clone());
        Ok(request)
    }

    fn list_requests(&self) -> Result<Vec<LogisticsRequest>, StorageError> {
        Ok(read(&self.requests)?.clone())
    }
}
