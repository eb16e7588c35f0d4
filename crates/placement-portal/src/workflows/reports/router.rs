use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{ReportId, ReportRequest};
use super::repository::ReportStore;
use super::service::{ReportError, ReportService};
use crate::identity::AdminPrincipal;
use crate::workflows::directory::DirectoryStore;
use crate::workflows::drives::DriveStore;
use crate::workflows::jobs::JobStore;

/// Report and dashboard endpoints; all admin-only.
pub fn report_router<S>(service: Arc<ReportService<S>>) -> Router
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    Router::new()
        .route("/api/reports", get(list_handler::<S>))
        .route("/api/reports/generate", post(generate_handler::<S>))
        .route(
            "/api/reports/:report_id",
            get(get_handler::<S>).delete(delete_handler::<S>),
        )
        .route("/api/dashboard/stats", get(stats_handler::<S>))
        .route("/api/dashboard/analytics", get(analytics_handler::<S>))
        .with_state(service)
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::NotFound(_) => StatusCode::NOT_FOUND,
            ReportError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn generate_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    AdminPrincipal(admin): AdminPrincipal,
    Json(request): Json<ReportRequest>,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.generate(request, &admin) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    _admin: AdminPrincipal,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.list() {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    _admin: AdminPrincipal,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.get(&ReportId(report_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    _admin: AdminPrincipal,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.delete(&ReportId(report_id)) {
        Ok(report) => {
            let payload = json!({ "message": "Report deleted", "report_id": report.id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    _admin: AdminPrincipal,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.dashboard_stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analytics_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    _admin: AdminPrincipal,
) -> Response
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    match service.analytics(Utc::now().date_naive()) {
        Ok(analytics) => (StatusCode::OK, Json(analytics)).into_response(),
        Err(err) => err.into_response(),
    }
}
