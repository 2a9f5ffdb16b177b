//! HTTP handlers over [`BmaService`].
//!
//! Service calls are synchronous store work, so every handler hops to the
//! blocking pool through [`run_blocking`].

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::bma::doctrine::checklist_for_mission;
use crate::bma::service::{now_ms, window_start_ms};
use crate::bma::{BmaError, BmaService};
use crate::types::{ThreatReport, Unit};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<BmaService>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(service: Arc<BmaService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

async fn run_blocking<T, F>(state: &ApiState, f: F) -> Result<T, Response>
where
    F: FnOnce(&BmaService) -> Result<T, BmaError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    match tokio::task::spawn_blocking(move || f(&service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(error = %e, "Request failed");
            Err(ApiErrorResponse::internal(e.to_string()))
        }
        Err(e) => Err(ApiErrorResponse::internal(format!("worker task failed: {e}"))),
    }
}

fn respond<T: Serialize>(result: Result<T, Response>) -> Response {
    result.map_or_else(|resp| resp, ApiResponse::ok)
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub weather_provider: &'static str,
}

pub async fn health(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        weather_provider: state.service.weather_provider().provider_name(),
    })
}

// ============================================================================
// BMA analytics
// ============================================================================

pub async fn recommendations(
    State(state): State<ApiState>,
    Path(threat_id): Path<String>,
) -> Response {
    respond(run_blocking(&state, move |svc| svc.recommend_for_threat(&threat_id)).await)
}

pub async fn logistics(State(state): State<ApiState>) -> Response {
    respond(run_blocking(&state, BmaService::predict_logistics).await)
}

pub async fn request_resupply(
    State(state): State<ApiState>,
    Path(unit_id): Path<String>,
) -> Response {
    let lookup_id = unit_id.clone();
    match run_blocking(&state, move |svc| svc.request_resupply(&lookup_id)).await {
        Ok(Some(request)) => ApiResponse::created(request),
        Ok(None) => ApiErrorResponse::not_found(format!("unit '{unit_id}' not found")),
        Err(resp) => resp,
    }
}

/// Runs a detection pass. The whole scan is returned so alert writes that
/// failed during the pass are visible to the caller.
pub async fn hotspots(State(state): State<ApiState>) -> Response {
    respond(run_blocking(&state, |svc| svc.identify_hotspots()).await)
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    pub hours: Option<u64>,
}

pub async fn historical_hotspots(
    State(state): State<ApiState>,
    Query(query): Query<HistoricalQuery>,
) -> Response {
    let hours = query
        .hours
        .unwrap_or(state.service.config().hotspot.historical_window_hours);
    if hours == 0 {
        return ApiErrorResponse::bad_request("hours must be at least 1");
    }
    respond(
        run_blocking(&state, move |svc| {
            let now = now_ms();
            svc.identify_hotspots_for_period(window_start_ms(now, hours), now)
        })
        .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct ChecklistQuery {
    #[serde(default)]
    pub mission_type: String,
}

pub async fn doctrine_checklist(Query(query): Query<ChecklistQuery>) -> Response {
    ApiResponse::ok(checklist_for_mission(&query.mission_type))
}

// ============================================================================
// Alerts
// ============================================================================

pub async fn list_alerts(State(state): State<ApiState>) -> Response {
    respond(run_blocking(&state, |svc| Ok(svc.stores().alerts.list_alerts()?)).await)
}

pub async fn acknowledge_alert(
    State(state): State<ApiState>,
    Path(alert_id): Path<String>,
) -> Response {
    let lookup_id = alert_id.clone();
    match run_blocking(&state, move |svc| {
        Ok(svc.stores().alerts.acknowledge_alert(&lookup_id)?)
    })
    .await
    {
        Ok(Some(alert)) => {
            info!(alert_id = %alert.id, "Alert acknowledged");
            ApiResponse::ok(alert)
        }
        Ok(None) => ApiErrorResponse::not_found(format!("alert '{alert_id}' not found")),
        Err(resp) => resp,
    }
}

// ============================================================================
// Snapshot ingestion
// ============================================================================

pub async fn list_units(State(state): State<ApiState>) -> Response {
    respond(run_blocking(&state, |svc| Ok(svc.stores().units.list_units()?)).await)
}

pub async fn upsert_unit(State(state): State<ApiState>, Json(unit): Json<Unit>) -> Response {
    if unit.id.trim().is_empty() {
        return ApiErrorResponse::bad_request("unit id must not be empty");
    }
    if unit.ammo_fraction.is_some_and(|a| !(0.0..=1.0).contains(&a)) {
        return ApiErrorResponse::bad_request("ammo_fraction must be within 0.0..=1.0");
    }
    if unit.days_of_supply.is_some_and(|d| !d.is_finite() || d < 0.0) {
        return ApiErrorResponse::bad_request("days_of_supply must be >= 0");
    }
    respond(
        run_blocking(&state, move |svc| {
            svc.stores().units.upsert_unit(&unit)?;
            Ok(unit)
        })
        .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    /// Epoch ms lower bound on `event_timestamp`
    pub since: Option<i64>,
}

pub async fn list_reports(
    State(state): State<ApiState>,
    Query(query): Query<ReportsQuery>,
) -> Response {
    let since = query.since.unwrap_or(i64::MIN);
    respond(
        run_blocking(&state, move |svc| {
            Ok(svc.stores().intel.list_reports_since(since)?)
        })
        .await,
    )
}

pub async fn upsert_report(
    State(state): State<ApiState>,
    Json(report): Json<ThreatReport>,
) -> Response {
    if report.id.trim().is_empty() {
        return ApiErrorResponse::bad_request("report id must not be empty");
    }
    respond(
        run_blocking(&state, move |svc| {
            svc.stores().intel.upsert_report(&report)?;
            Ok(report)
        })
        .await,
    )
}
