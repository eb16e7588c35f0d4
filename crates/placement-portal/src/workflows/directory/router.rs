use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    CompanyFilter, CompanyId, CompanyPatch, NewCompany, NewStudent, StudentFilter, StudentId,
    StudentPatch,
};
use super::repository::DirectoryStore;
use super::service::{DirectoryError, DirectoryService};
use crate::identity::{AdminPrincipal, IdentityRejection, Principal, Role};

/// Student and company administration endpoints.
pub fn directory_router<S>(service: Arc<DirectoryService<S>>) -> Router
where
    S: DirectoryStore + 'static,
{
    Router::new()
        .route(
            "/api/companies",
            get(list_companies_handler::<S>).post(create_company_handler::<S>),
        )
        .route(
            "/api/companies/:company_id",
            get(get_company_handler::<S>)
                .put(update_company_handler::<S>)
                .delete(delete_company_handler::<S>),
        )
        .route(
            "/api/students",
            get(list_students_handler::<S>).post(create_student_handler::<S>),
        )
        .route("/api/students/bulk", post(bulk_students_handler::<S>))
        .route("/api/students/import", post(import_students_handler::<S>))
        .route(
            "/api/students/:student_id",
            get(get_student_handler::<S>)
                .put(update_student_handler::<S>)
                .delete(delete_student_handler::<S>),
        )
        .route(
            "/api/students/:student_id/approve",
            patch(approve_student_handler::<S>),
        )
        .route(
            "/api/students/:student_id/reject",
            patch(reject_student_handler::<S>),
        )
        .route(
            "/api/students/:student_id/disable",
            patch(disable_student_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkStudents {
    students: Vec<NewStudent>,
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            DirectoryError::StudentNotFound(_) | DirectoryError::CompanyNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DirectoryError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DirectoryError::Roster(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Duplicate | DirectoryError::Referenced { .. } => StatusCode::CONFLICT,
            DirectoryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn list_companies_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _principal: Principal,
    Query(filter): Query<CompanyFilter>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.list_companies(&filter) {
        Ok(companies) => (StatusCode::OK, Json(companies)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_company_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Json(draft): Json<NewCompany>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.create_company(draft) {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_company_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _principal: Principal,
    Path(company_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.get_company(&CompanyId(company_id)) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_company_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(company_id): Path<String>,
    Json(patch): Json<CompanyPatch>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.update_company(&CompanyId(company_id), patch) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_company_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(company_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.delete_company(&CompanyId(company_id)) {
        Ok(company) => {
            let payload = json!({ "message": "Company deleted", "company_id": company.id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_students_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Query(filter): Query<StudentFilter>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.list_students(&filter) {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Json(draft): Json<NewStudent>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.create_student(draft) {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn bulk_students_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Json(body): Json<BulkStudents>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.bulk_create_students(body.students) {
        Ok(students) => {
            let payload = json!({ "created": students.len(), "students": students });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Accepts a headed CSV roster as the raw request body.
pub(crate) async fn import_students_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    body: String,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.import_roster(body.as_bytes()) {
        Ok(students) => {
            let payload = json!({ "created": students.len(), "students": students });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    principal: Principal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    if principal.role == Role::Student && principal.id != student_id {
        return IdentityRejection::Forbidden("students may only view their own profile")
            .into_response();
    }
    match service.get_student(&StudentId(student_id)) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(student_id): Path<String>,
    Json(patch): Json<StudentPatch>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.update_student(&StudentId(student_id), patch) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn approve_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.approve_student(&StudentId(student_id)) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reject_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.reject_student(&StudentId(student_id)) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn disable_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.disable_student(&StudentId(student_id)) {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_student_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    _admin: AdminPrincipal,
    Path(student_id): Path<String>,
) -> Response
where
    S: DirectoryStore + 'static,
{
    match service.delete_student(&StudentId(student_id)) {
        Ok(student) => {
            let payload = json!({ "message": "Student deleted", "student_id": student.id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
