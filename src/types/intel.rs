//! Intelligence / threat report snapshot.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Threat report: the subject of a recommendation query and raw clustering input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Option<GeoPoint>,
    /// Free-text keyword tags matched against unit capabilities
    #[serde(default)]
    pub keywords: Vec<String>,
    /// When the reported event happened (epoch ms)
    pub event_timestamp: i64,
    /// When the report was filed (epoch ms)
    pub report_timestamp: i64,
}
