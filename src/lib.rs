//! BMA Engine: Battlespace Management Analytics
//!
//! Decision support derived from live unit and intelligence snapshots.
//!
//! ## Architecture
//!
//! - **Recommendation Engine**: ranks units able to respond to a threat
//! - **Logistics Forecaster**: flags units short on supply, names the nearest support unit
//! - **Hotspot Detector**: clusters recent reports, alerts units inside the clusters
//! - **Alert Gate**: one unacknowledged alert per unit, type and day
//! - **Mobility Model**: weather and terrain adjusted speed for intercept estimates
//!
//! The engines read through the store traits in [`storage`] and never
//! mutate unit or report data.

pub mod api;
pub mod bma;
pub mod config;
pub mod geo;
pub mod scheduler;
pub mod storage;
pub mod types;
pub mod weather;

pub use bma::{BmaError, BmaService};
pub use config::BmaConfig;
pub use storage::{StorageError, Stores};
pub use types::{
    Alert, AlertSeverity, AlertType, GeoPoint, Hotspot, LogisticsForecast, LogisticsRequest,
    Recommendation, ThreatReport, Unit, UnitCategory, UnitStatus, WeatherInfo,
};
