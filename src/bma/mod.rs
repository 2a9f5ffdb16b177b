//! Battlespace Management Analytics engines
//!
//! - [`mobility`]: effective cross-country speed from weather and terrain
//! - [`recommendation`]: ranks units able to respond to a threat
//! - [`logistics`]: flags units short on supply and names a support unit
//! - [`hotspot`]: clusters recent reports and alerts units inside them
//! - [`alert_gate`]: once-per-day alert deduplication
//! - [`doctrine`]: static pre-mission checklists
//! - [`service`]: wires the engines to storage and weather
//!
//! Engines are pure over the snapshot they are given. Only the hotspot pass
//! writes, and only new alerts.

pub mod alert_gate;
pub mod doctrine;
pub mod hotspot;
pub mod logistics;
pub mod mobility;
pub mod recommendation;
pub mod service;

pub use alert_gate::{AlertGate, GateOutcome};
pub use hotspot::{AlertFailure, HotspotDetector, HotspotScan};
pub use logistics::LogisticsForecaster;
pub use mobility::MobilityModel;
pub use recommendation::RecommendationEngine;
pub use service::{BmaError, BmaService};
