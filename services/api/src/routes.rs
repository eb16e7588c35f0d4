use crate::infra::{AppState, PortalServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use placement_portal::workflows::directory::{directory_router, Branch};
use placement_portal::workflows::drives::drive_router;
use placement_portal::workflows::jobs::{job_router, JobType};
use placement_portal::workflows::reports::report_router;
use serde_json::json;

/// Every workflow router plus the process endpoints.
pub(crate) fn portal_routes(services: &PortalServices) -> Router {
    Router::new()
        .merge(directory_router(services.directory.clone()))
        .merge(drive_router(services.drives.clone()))
        .merge(job_router(services.jobs.clone()))
        .merge(report_router(services.reports.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/health", get(api_health))
        .route("/api/utility/branches", get(branches_endpoint))
        .route("/api/utility/job-types", get(job_types_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn api_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now() }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn branches_endpoint() -> Json<Vec<&'static str>> {
    Json(Branch::all().into_iter().map(Branch::code).collect())
}

pub(crate) async fn job_types_endpoint() -> Json<Vec<&'static str>> {
    Json(JobType::all().into_iter().map(JobType::label).collect())
}
