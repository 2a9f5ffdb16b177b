//! Ephemeral analytics outputs: recommendations, logistics forecasts, hotspots.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Ranked response candidate for a threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub unit_id: String,
    pub unit_name: String,
    /// Space-separated justification for every scoring term that fired
    pub reasoning: String,
    /// Composite score, clamped to >= 0 (no upper bound)
    pub score: f64,
    /// Minutes to reach the threat; `None` when the unit cannot move
    pub time_to_intercept_minutes: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupplySeverity {
    Critical,
    Low,
}

impl std::fmt::Display for SupplySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsForecast {
    pub unit_id: String,
    pub unit_name: String,
    pub days_remaining: f64,
    pub severity: SupplySeverity,
    pub recommendation: String,
}

/// Spatial cluster of recent reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub center: GeoPoint,
    pub radius_km: f64,
    /// Number of reports in the cluster
    pub intensity: usize,
    pub description: String,
    /// Ids of the member reports, seed first
    #[serde(default)]
    pub report_ids: Vec<String>,
}
