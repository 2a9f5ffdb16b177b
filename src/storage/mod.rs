//! Store contracts consumed by the analytics core
//!
//! The BMA engines never own unit, report or alert data. They read
//! snapshots through these traits and append alerts / resupply requests.
//! Two backends implement all four traits:
//! - [`InMemoryStore`]: `RwLock<Vec<_>>` collections for tests and
//!   ephemeral deployments
//! - [`SledStore`]: named sled trees with JSON values, durable
//!
//! All traits are synchronous and `Send + Sync`; async callers go through
//! `spawn_blocking`.

pub mod lockfile;
mod memory;
mod sled_store;

pub use lockfile::ProcessLock;
pub use memory::InMemoryStore;
pub use sled_store::SledStore;

use std::sync::Arc;

use crate::types::{Alert, LogisticsRequest, ThreatReport, Unit};

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage lock poisoned: {0}")]
    Poisoned(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Unit snapshots. No filtering is done by the store.
pub trait UnitStore: Send + Sync {
    fn list_units(&self) -> Result<Vec<Unit>, StorageError>;
    fn get_unit(&self, id: &str) -> Result<Option<Unit>, StorageError>;
    /// Insert or replace by id (ingestion path for the CRUD layer)
    fn upsert_unit(&self, unit: &Unit) -> Result<(), StorageError>;
}

/// Intelligence reports.
pub trait IntelStore: Send + Sync {
    /// Reports whose `event_timestamp >= since_ms`, in a stable order.
    fn list_reports_since(&self, since_ms: i64) -> Result<Vec<ThreatReport>, StorageError>;
    fn get_report(&self, id: &str) -> Result<Option<ThreatReport>, StorageError>;
    fn upsert_report(&self, report: &ThreatReport) -> Result<(), StorageError>;
}

/// Operator alerts. The core only lists and creates.
pub trait AlertStore: Send + Sync {
    fn list_alerts(&self) -> Result<Vec<Alert>, StorageError>;
    fn create_alert(&self, alert: Alert) -> Result<Alert, StorageError>;
    /// Mark an alert acknowledged; `None` if the id is unknown
    fn acknowledge_alert(&self, id: &str) -> Result<Option<Alert>, StorageError>;
}

/// Destination for resupply requests.
pub trait LogisticsRequestSink: Send + Sync {
    fn submit_resupply_request(
        &self,
        request: LogisticsRequest,
    ) -> Result<LogisticsRequest, StorageError>;
    fn list_requests(&self) -> Result<Vec<LogisticsRequest>, StorageError>;
}

/// The four collaborators the service layer talks to.
///
/// Held separately so a deployment (or a test) can back each contract with
/// a different implementation.
#[derive(Clone)]
pub struct Stores {
    pub units: Arc<dyn UnitStore>,
    pub intel: Arc<dyn IntelStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub logistics: Arc<dyn LogisticsRequestSink>,
}

impl Stores {
    /// Use one backend for every contract.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: UnitStore + IntelStore + AlertStore + LogisticsRequestSink + 'static,
    {
        Self {
            units: backend.clone(),
            intel: backend.clone(),
            alerts: backend.clone(),
            logistics: backend,
        }
    }

    /// Fresh in-memory backend for every contract.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryStore::new()))
    }
}

/// Unit and report snapshot loaded at startup (`--seed`).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub reports: Vec<ThreatReport>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl Stores {
    /// Upsert every unit and report of `snapshot`. Returns (units, reports) written.
    pub fn seed(&self, snapshot: &Snapshot) -> Result<(usize, usize), StorageError> {
        for unit in &snapshot.units {
            self.units.upsert_unit(unit)?;
        }
        for report in &snapshot.reports {
            self.intel.upsert_report(report)?;
        }
        Ok((snapshot.units.len(), snapshot.reports.len()))
    }
}
