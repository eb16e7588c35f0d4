use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{DriveFilter, DriveId, DriveResults, DriveUpdate, NewDrive, RegistrationRequest};
use super::repository::DriveStore;
use super::service::{DriveError, DriveService};
use crate::identity::{AdminPrincipal, IdentityRejection, Principal, Role};
use crate::workflows::directory::{DirectoryStore, StudentId};

/// Drive lifecycle endpoints.
pub fn drive_router<S>(service: Arc<DriveService<S>>) -> Router
where
    S: DriveStore + DirectoryStore + 'static,
{
    Router::new()
        .route(
            "/api/drives",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/api/drives/:drive_id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route("/api/drives/:drive_id/register", post(register_handler::<S>))
        .route("/api/drives/:drive_id/results", post(results_handler::<S>))
        .route(
            "/api/students/:student_id/eligible-drives",
            get(eligible_drives_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for DriveError {
    fn into_response(self) -> Response {
        let status = match &self {
            DriveError::NotFound(_) => StatusCode::NOT_FOUND,
            DriveError::IneligibleStatus { .. }
            | DriveError::IneligibleCriteria { .. }
            | DriveError::InconsistentResults(_)
            | DriveError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DriveError::AlreadyRegistered { .. }
            | DriveError::RegistrationClosed { .. }
            | DriveError::InvalidTransition { .. }
            | DriveError::ConcurrentModification(_) => StatusCode::CONFLICT,
            DriveError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _principal: Principal,
    Query(filter): Query<DriveFilter>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.list(&filter) {
        Ok(drives) => (StatusCode::OK, Json(drives)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _admin: AdminPrincipal,
    Json(draft): Json<NewDrive>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.create(draft) {
        Ok(drive) => (StatusCode::CREATED, Json(drive)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _principal: Principal,
    Path(drive_id): Path<String>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.get(&DriveId(drive_id)) {
        Ok(drive) => (StatusCode::OK, Json(drive)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _admin: AdminPrincipal,
    Path(drive_id): Path<String>,
    Json(update): Json<DriveUpdate>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.update(&DriveId(drive_id), update) {
        Ok(drive) => (StatusCode::OK, Json(drive)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _admin: AdminPrincipal,
    Path(drive_id): Path<String>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.delete(&DriveId(drive_id)) {
        Ok(drive) => {
            let payload = json!({ "message": "Drive deleted", "drive_id": drive.id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    principal: Principal,
    Path(drive_id): Path<String>,
    Json(request): Json<RegistrationRequest>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    if !principal.may_act_for(Role::Student, &request.student_id.0) {
        return IdentityRejection::Forbidden("students may only register themselves")
            .into_response();
    }

    match service.register_student(&DriveId(drive_id), &request.student_id) {
        Ok(drive) => {
            let payload = json!({ "message": "Registration successful", "drive": drive });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn results_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    _admin: AdminPrincipal,
    Path(drive_id): Path<String>,
    Json(results): Json<DriveResults>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    match service.submit_results(&DriveId(drive_id), results) {
        Ok(drive) => (StatusCode::OK, Json(drive)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn eligible_drives_handler<S>(
    State(service): State<Arc<DriveService<S>>>,
    principal: Principal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DriveStore + DirectoryStore + 'static,
{
    if !principal.may_act_for(Role::Student, &student_id) {
        return IdentityRejection::Forbidden("students may only view their own eligibility")
            .into_response();
    }

    match service.eligible_drives(&StudentId(student_id)) {
        Ok(drives) => (StatusCode::OK, Json(drives)).into_response(),
        Err(err) => err.into_response(),
    }
}
