//! Shared data structures for the Battlespace Management Analytics core
//!
//! - Inputs (read-only snapshots): `Unit`, `ThreatReport`, `WeatherInfo`
//! - Outputs (ephemeral): `Recommendation`, `LogisticsForecast`, `Hotspot`
//! - Side-effect records: `Alert`, `LogisticsRequest`

mod geo_point;
mod unit;
mod intel;
mod alert;
mod weather;
mod analytics;
mod logistics;

pub use geo_point::*;
pub use unit::*;
pub use intel::*;
pub use alert::*;
pub use weather::*;
pub use analytics::*;
pub use logistics::*;
