//! Doctrinal pre-mission checklists.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Attack,
    Defense,
    Reconnaissance,
    Other,
}

impl MissionType {
    /// Case-insensitive; unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "attack" | "ataque" => Self::Attack,
            "defense" | "defence" | "defensa" => Self::Defense,
            "reconnaissance" | "recon" | "reconocimiento" => Self::Reconnaissance,
            _ => Self::Other,
        }
    }

    pub const fn checklist(self) -> &'static [&'static str] {
        match self {
            Self::Attack => &[
                "Verify line of departure and H-hour.",
                "Establish the base-of-fire element.",
                "Coordinate indirect fire support.",
                "Secure communications with flank units.",
                "Confirm the casualty evacuation plan (MEDEVAC).",
            ],
            Self::Defense => &[
                "Establish sectors of fire.",
                "Prepare primary and alternate positions.",
                "Emplace coordinated obstacles and minefields.",
                "Verify fields of fire are clear.",
                "Establish liaison with adjacent units.",
            ],
            Self::Reconnaissance => &[
                "Define insertion and extraction routes.",
                "Establish objective rally points (ORP).",
                "Check observation and concealment equipment.",
                "Confirm the intelligence reporting protocol.",
                "Brief mission-specific rules of engagement (ROE).",
            ],
            Self::Other => &[
                "Check communications equipment.",
                "Confirm operations orders.",
                "Review supply status.",
                "Ensure perimeter security.",
            ],
        }
    }
}

pub fn checklist_for_mission(mission_type: &str) -> Vec<String> {
    MissionType::parse(mission_type)
        .checklist()
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}
