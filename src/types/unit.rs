//! Military unit snapshot as seen by the analytics core.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Operational status of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Operational,
    Moving,
    Static,
    Engaged,
    LowSupplies,
    NoCommunication,
    Maintenance,
    PendingAfterAction,
    OnLeave,
}

impl UnitStatus {
    /// Units that can be tasked against a threat or warned about one.
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Operational | Self::Engaged)
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Operational => "operational",
            Self::Moving => "moving",
            Self::Static => "static",
            Self::Engaged => "engaged",
            Self::LowSupplies => "low-supplies",
            Self::NoCommunication => "no-communication",
            Self::Maintenance => "maintenance",
            Self::PendingAfterAction => "pending-after-action",
            Self::OnLeave => "on-leave",
        };
        write!(f, "{s}")
    }
}

/// Echelon / role of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Division,
    Brigade,
    Battalion,
    Company,
    Platoon,
    Team,
    Squad,
    CommandPost,
    UavAttackTeam,
    UavIntelTeam,
}

impl UnitCategory {
    /// Echelons that hold stocks and can resupply subordinate units.
    pub const fn is_support_echelon(self) -> bool {
        matches!(self, Self::Battalion | Self::Brigade)
    }
}

/// Read-only unit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub category: UnitCategory,
    /// Last known position; absent units are excluded from spatial analytics
    #[serde(default)]
    pub position: Option<GeoPoint>,
    pub status: UnitStatus,
    /// Free-text capability tags, compared case-insensitively
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Ammunition as a fraction of basic load (0.0-1.0)
    #[serde(default)]
    pub ammo_fraction: Option<f64>,
    /// Remaining days of supply
    #[serde(default)]
    pub days_of_supply: Option<f64>,
}

impl Unit {
    /// True if any capability tag contains any of `keywords` (case-insensitive substring).
    pub fn matches_any_keyword(&self, keywords: &[String]) -> bool {
        let keywords: Vec<String> = keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| k.to_lowercase())
            .collect();
        self.capabilities.iter().any(|cap| {
            let cap = cap.to_lowercase();
            keywords.iter().any(|k| cap.contains(k.as_str()))
        })
    }
}
