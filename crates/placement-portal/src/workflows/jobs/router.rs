use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::{JobFilter, JobId, JobPatch, NewJobPosting};
use super::repository::JobStore;
use super::service::{JobError, JobService};
use crate::identity::{IdentityRejection, Principal, Role};
use crate::workflows::directory::DirectoryStore;

/// Job posting endpoints. Companies manage their own postings; admins manage all.
pub fn job_router<S>(service: Arc<JobService<S>>) -> Router
where
    S: JobStore + DirectoryStore + 'static,
{
    Router::new()
        .route("/api/jobs", get(list_handler::<S>).post(create_handler::<S>))
        .route(
            "/api/jobs/:job_id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let status = match &self {
            JobError::NotFound(_) | JobError::CompanyNotFound(_) => StatusCode::NOT_FOUND,
            JobError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JobError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn forbidden() -> Response {
    IdentityRejection::Forbidden("only the owning company or an admin may manage this posting")
        .into_response()
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    _principal: Principal,
    Query(filter): Query<JobFilter>,
) -> Response
where
    S: JobStore + DirectoryStore + 'static,
{
    match service.list(&filter) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    principal: Principal,
    Json(draft): Json<NewJobPosting>,
) -> Response
where
    S: JobStore + DirectoryStore + 'static,
{
    if !principal.may_act_for(Role::Company, &draft.company.0) {
        return forbidden();
    }
    match service.create(draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    _principal: Principal,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + DirectoryStore + 'static,
{
    match service.get(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    principal: Principal,
    Path(job_id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Response
where
    S: JobStore + DirectoryStore + 'static,
{
    let id = JobId(job_id);
    let owner = match service.get(&id) {
        Ok(job) => job.company,
        Err(err) => return err.into_response(),
    };
    if !principal.may_act_for(Role::Company, &owner.0) {
        return forbidden();
    }

    match service.update(&id, patch) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<JobService<S>>>,
    principal: Principal,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + DirectoryStore + 'static,
{
    let id = JobId(job_id);
    let owner = match service.get(&id) {
        Ok(job) => job.company,
        Err(err) => return err.into_response(),
    };
    if !principal.may_act_for(Role::Company, &owner.0) {
        return forbidden();
    }

    match service.delete(&id) {
        Ok(job) => {
            let payload = json!({ "message": "Job deleted", "job_id": job.id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
