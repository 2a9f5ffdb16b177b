//! Once-per-day alert deduplication
//!
//! A new alert for (unit, type) is suppressed while an unacknowledged
//! alert with the same unit and type exists whose timestamp is at or after
//! the start of the current UTC day. Acknowledging re-arms the gate.
//!
//! The check and the create happen under a lock keyed by
//! (unit, type, day), so two concurrent passes cannot both see "no alert"
//! and both create one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::config::defaults::MS_PER_DAY;
use crate::storage::{AlertStore, StorageError};
use crate::types::{Alert, AlertType};

/// Start of the UTC day containing `now_ms`.
pub const fn day_start_ms(now_ms: i64) -> i64 {
    now_ms - now_ms.rem_euclid(MS_PER_DAY)
}

/// True when `existing` already holds a live alert for `unit_id`/`alert_type` today.
pub fn should_suppress(
    existing: &[Alert],
    unit_id: &str,
    alert_type: &AlertType,
    now_ms: i64,
) -> bool {
    let today = day_start_ms(now_ms);
    existing.iter().any(|a| {
        a.unit_id.as_deref() == Some(unit_id)
            && a.alert_type == *alert_type
            && !a.acknowledged
            && a.timestamp >= today
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Created(Alert),
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GateKey {
    unit_id: String,
    alert_type: String,
    day_start_ms: i64,
}

/// Serializes check-then-create per (unit, type, day).
#[derive(Debug, Default)]
pub struct AlertGate {
    locks: Mutex<HashMap<GateKey, Arc<Mutex<()>>>>,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_lock(&self, key: GateKey) -> Result<Arc<Mutex<()>>, StorageError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        // Keys from previous days can never be contended again
        locks.retain(|k, _| k.day_start_ms >= key.day_start_ms);
        Ok(Arc::clone(locks.entry(key).or_default()))
    }

    /// Create `alert` unless the gate suppresses it.
    ///
    /// Alerts without a unit are not deduplicated.
    pub fn create_if_allowed(
        &self,
        store: &dyn AlertStore,
        alert: Alert,
        now_ms: i64,
    ) -> Result<GateOutcome, StorageError> {
        let Some(unit_id) = alert.unit_id.clone() else {
            return store.create_alert(alert).map(GateOutcome::Created);
        };

        let lock = self.key_lock(GateKey {
            unit_id: unit_id.clone(),
            alert_type: alert.alert_type.as_str().to_string(),
            day_start_ms: day_start_ms(now_ms),
        })?;
        let _guard = lock
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;

        let existing = store.list_alerts()?;
        if should_suppress(&existing, &unit_id, &alert.alert_type, now_ms) {
            debug!(unit_id = %unit_id, alert_type = %alert.alert_type, "Alert suppressed for today");
            return Ok(GateOutcome::Suppressed);
        }

        store.create_alert(alert).map(GateOutcome::Created)
    }

    /// Number of live lock entries (current day and later).
    pub fn tracked_keys(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}
