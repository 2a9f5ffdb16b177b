//! API route table, mounted under `/api/v1`.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // BMA analytics
        .route("/bma/recommendations/:threat_id", get(handlers::recommendations))
        .route("/bma/logistics", get(handlers::logistics))
        .route("/bma/logistics/request/:unit_id", post(handlers::request_resupply))
        .route("/bma/hotspots", get(handlers::hotspots))
        .route("/bma/hotspots/historical", get(handlers::historical_hotspots))
        .route("/bma/doctrine/checklist", get(handlers::doctrine_checklist))
        // Alerts
        .route("/alerts", get(handlers::list_alerts))
        .route("/alerts/:id/acknowledge", post(handlers::acknowledge_alert))
        // Snapshot ingestion
        .route("/units", get(handlers::list_units).post(handlers::upsert_unit))
        .route("/reports", get(handlers::list_reports).post(handlers::upsert_report))
        .with_state(state)
}
