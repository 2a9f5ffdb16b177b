//! Threat hotspot detection
//!
//! Clustering is a single greedy pass over the reports in their given
//! order. Each unprocessed report seeds a cluster and absorbs every later
//! unprocessed report strictly within `cluster_radius_km` of the seed (not
//! of the running centroid). A different input order can therefore yield
//! different clusters; callers get a stable result by passing reports in a
//! stable order, which both stores guarantee.
//!
//! For each hotspot, available units strictly inside the radius of its
//! center get a `hotspot-threat` alert through the [`AlertGate`].

use serde::Serialize;
use tracing::{debug, warn};

use super::alert_gate::{AlertGate, GateOutcome};
use crate::config::HotspotConfig;
use crate::geo;
use crate::storage::AlertStore;
use crate::types::{Alert, AlertSeverity, AlertType, GeoPoint, Hotspot, ThreatReport, Unit};

/// Alert write that failed for one unit; the pass carried on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertFailure {
    pub unit_id: String,
    pub error: String,
}

/// Result of one detection pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HotspotScan {
    pub hotspots: Vec<Hotspot>,
    pub alerts_created: Vec<Alert>,
    pub suppressed: usize,
    pub failures: Vec<AlertFailure>,
}

/// Greedy seed-based clustering. Reports without a position are ignored.
pub fn cluster_reports(
    reports: &[ThreatReport],
    radius_km: f64,
    min_size: usize,
) -> Vec<Hotspot> {
    let located: Vec<(&ThreatReport, &GeoPoint)> = reports
        .iter()
        .filter_map(|r| r.position.as_ref().map(|p| (r, p)))
        .collect();

    let mut processed = vec![false; located.len()];
    let mut hotspots = Vec::new();

    for i in 0..located.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let (seed, seed_pos) = located[i];
        let mut members = vec![(seed, seed_pos)];

        for j in (i + 1)..located.len() {
            if processed[j] {
                continue;
            }
            let (report, pos) = located[j];
            if geo::distance_km(Some(seed_pos), Some(pos)) < radius_km {
                processed[j] = true;
                members.push((report, pos));
            }
        }

        if members.len() < min_size {
            continue;
        }
        let Some(center) = GeoPoint::centroid(members.iter().map(|(_, p)| *p)) else {
            continue;
        };
        let intensity = members.len();
        hotspots.push(Hotspot {
            center,
            radius_km,
            intensity,
            description: format!(
                "Concentration of {intensity} reports detected. Elevated risk area."
            ),
            report_ids: members.iter().map(|(r, _)| r.id.clone()).collect(),
        });
    }

    hotspots
}

#[derive(Debug, Clone, Default)]
pub struct HotspotDetector {
    cfg: HotspotConfig,
}

impl HotspotDetector {
    pub const fn new(cfg: HotspotConfig) -> Self {
        Self { cfg }
    }

    pub fn cluster(&self, reports: &[ThreatReport]) -> Vec<Hotspot> {
        cluster_reports(reports, self.cfg.cluster_radius_km, self.cfg.min_cluster_size)
    }

    /// Cluster `reports` and raise gated alerts for `units` inside each hotspot.
    ///
    /// A failed alert write is recorded in [`HotspotScan::failures`] and the
    /// pass continues with the next unit.
    pub fn detect(
        &self,
        reports: &[ThreatReport],
        units: &[Unit],
        alerts: &dyn AlertStore,
        gate: &AlertGate,
        now_ms: i64,
    ) -> HotspotScan {
        let mut scan = HotspotScan {
            hotspots: self.cluster(reports),
            ..HotspotScan::default()
        };

        for hotspot in &scan.hotspots {
            for unit in units.iter().filter(|u| u.status.is_available()) {
                let distance = geo::distance_km(unit.position.as_ref(), Some(&hotspot.center));
                if distance >= hotspot.radius_km {
                    continue;
                }

                let alert = hotspot_alert(unit, hotspot, now_ms);
                match gate.create_if_allowed(alerts, alert, now_ms) {
                    Ok(GateOutcome::Created(alert)) => {
                        debug!(unit_id = %unit.id, intensity = hotspot.intensity, "Hotspot alert raised");
                        scan.alerts_created.push(alert);
                    }
                    Ok(GateOutcome::Suppressed) => scan.suppressed += 1,
                    Err(e) => {
                        warn!(unit_id = %unit.id, error = %e, "Failed to store hotspot alert");
                        scan.failures.push(AlertFailure {
                            unit_id: unit.id.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        scan
    }
}

fn hotspot_alert(unit: &Unit, hotspot: &Hotspot, now_ms: i64) -> Alert {
    Alert::new(
        AlertType::HotspotThreat,
        Some(unit.id.clone()),
        AlertSeverity::High,
        format!(
            "BMA ALERT: unit {} is inside a high-intensity hotspot ({} reports). Raise readiness.",
            unit.name, hotspot.intensity
        ),
        now_ms,
        unit.position,
    )
}
