//! Operator alerts produced by the analytics core.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Alert category tag.
///
/// Only the BMA-produced types are enumerated; alerts written by other
/// producers keep their tag in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    HotspotThreat,
    #[serde(untagged)]
    Other(String),
}

impl AlertType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HotspotThreat => "hotspot-threat",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// Persisted alert record.
///
/// The core only ever appends these; acknowledgement happens through the
/// operator API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    #[serde(default)]
    pub unit_id: Option<String>,
    pub severity: AlertSeverity,
    pub message: String,
    /// Creation time (epoch ms)
    pub timestamp: i64,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl Alert {
    /// New unacknowledged alert with a random id.
    pub fn new(
        alert_type: AlertType,
        unit_id: Option<String>,
        severity: AlertSeverity,
        message: String,
        timestamp: i64,
        location: Option<GeoPoint>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            alert_type,
            unit_id,
            severity,
            message,
            timestamp,
            acknowledged: false,
            location,
        }
    }
}
