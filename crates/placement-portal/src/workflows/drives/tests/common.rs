use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::{Extension, Router};
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::PortalConfig;
use crate::identity::{Principal, Role, SharedIdentity, TokenRegistry};
use crate::store::{InMemoryPortalStore, RepositoryError, Sequence, SequenceAllocator};
use crate::workflows::directory::{
    Branch, Company, CompanyFilter, CompanyId, CompanyPatch, DirectoryStore, NewCompany,
    NewStudent, PlacementGrant, Student, StudentFilter, StudentId, StudentPatch, StudentStatus,
};
use crate::workflows::drives::{
    drive_router, Drive, DriveFilter, DriveId, DriveService, DriveStore, EligibilityCriteria,
    NewDrive, Registration,
};

pub(super) const ADMIN_TOKEN: &str = "admin-token";
pub(super) const STUDENT_TOKEN: &str = "student-token";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn criteria() -> EligibilityCriteria {
    EligibilityCriteria {
        min_cgpa: 6.0,
        branches: vec![Branch::Cse],
        max_backlogs: 0,
        min_tenth_percentage: None,
        min_twelfth_percentage: None,
    }
}

pub(super) fn new_student(name: &str, cgpa: f64, branch: Branch) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        email: format!("{}@college.test", name.to_ascii_lowercase()),
        branch,
        cgpa,
        semester: Some(7),
        backlogs: 0,
        phone: None,
        resume_link: None,
        skills: vec!["Rust".to_string()],
        certifications: Vec::new(),
        tenth_percentage: Some(88.0),
        twelfth_percentage: Some(84.5),
        status: Some(StudentStatus::Approved),
    }
}

pub(super) fn new_drive(company: &CompanyId) -> NewDrive {
    NewDrive {
        company: company.clone(),
        title: "Campus Hiring 2025".to_string(),
        description: Some("Graduate engineer trainee".to_string()),
        roles: vec!["Software Engineer".to_string(), "Analyst".to_string()],
        eligibility: criteria(),
        drive_date: date(2025, 2, 14),
        registration_deadline: Some(date(2025, 2, 7)),
        venue: Some("Main auditorium".to_string()),
        rounds: Vec::new(),
    }
}

pub(super) struct Fixture {
    pub(super) store: Arc<InMemoryPortalStore>,
    pub(super) service: DriveService<InMemoryPortalStore>,
    pub(super) company: Company,
}

impl Fixture {
    pub(super) fn new() -> Self {
        Self::with_config(PortalConfig::default())
    }

    pub(super) fn with_config(config: PortalConfig) -> Self {
        let store = Arc::new(InMemoryPortalStore::new());
        let company = insert_company(&store, "Acme Systems");
        let service = DriveService::new(store.clone(), &config);
        Self {
            store,
            service,
            company,
        }
    }

    pub(super) fn student(&self, name: &str, cgpa: f64) -> Student {
        self.student_with(new_student(name, cgpa, Branch::Cse))
    }

    pub(super) fn student_with(&self, draft: NewStudent) -> Student {
        let id = StudentId(self.store.next_id(Sequence::Student).expect("sequence"));
        self.store
            .insert_student(draft.into_student(id, chrono::Utc::now()))
            .expect("student inserted")
    }

    pub(super) fn drive(&self) -> Drive {
        self.service
            .create(new_drive(&self.company.id))
            .expect("drive created")
    }

    pub(super) fn reload(&self, id: &StudentId) -> Student {
        self.store
            .find_student(id)
            .expect("store available")
            .expect("student exists")
    }
}

pub(super) fn insert_company(store: &InMemoryPortalStore, name: &str) -> Company {
    let id = CompanyId(store.next_id(Sequence::Company).expect("sequence"));
    let draft = NewCompany {
        name: name.to_string(),
        hr_name: "Priya Raman".to_string(),
        hr_email: "hr@acme.test".to_string(),
        hr_phone: None,
        industry: Some("Software".to_string()),
        website: None,
        address: None,
        roles: vec!["Software Engineer".to_string()],
    };
    store
        .insert_company(draft.into_company(id, chrono::Utc::now()))
        .expect("company inserted")
}

pub(super) fn router_for(fixture: &Fixture, student: &StudentId) -> Router {
    let registry = TokenRegistry::new();
    registry.register(ADMIN_TOKEN, Principal::new("ADM0001", Role::Admin));
    registry.register(STUDENT_TOKEN, Principal::new(student.0.clone(), Role::Student));
    let identity: SharedIdentity = Arc::new(registry);

    let service = DriveService::new(fixture.store.clone(), &PortalConfig::default());
    drive_router(Arc::new(service)).layer(Extension(identity))
}

pub(super) fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Store whose every call fails as if the backing database were down.
pub(super) struct OfflineStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("connection refused".to_string()))
}

impl SequenceAllocator for OfflineStore {
    fn next_number(&self, _sequence: Sequence) -> Result<u64, RepositoryError> {
        offline()
    }
}

impl DriveStore for OfflineStore {
    fn insert_drive(&self, _drive: Drive) -> Result<Drive, RepositoryError> {
        offline()
    }

    fn find_drive(&self, _id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        offline()
    }

    fn replace_drive(&self, _drive: Drive) -> Result<Drive, RepositoryError> {
        offline()
    }

    fn complete_drive(
        &self,
        _drive: Drive,
        _grant: &PlacementGrant,
    ) -> Result<Drive, RepositoryError> {
        offline()
    }

    fn add_registration(
        &self,
        _id: &DriveId,
        _student: &StudentId,
    ) -> Result<Registration, RepositoryError> {
        offline()
    }

    fn delete_drive(&self, _id: &DriveId) -> Result<Drive, RepositoryError> {
        offline()
    }

    fn list_drives(&self, _filter: &DriveFilter) -> Result<Vec<Drive>, RepositoryError> {
        offline()
    }

    fn count_drives(&self, _filter: &DriveFilter) -> Result<usize, RepositoryError> {
        offline()
    }
}

impl DirectoryStore for OfflineStore {
    fn insert_student(&self, _student: Student) -> Result<Student, RepositoryError> {
        offline()
    }

    fn insert_students(&self, _students: Vec<Student>) -> Result<Vec<Student>, RepositoryError> {
        offline()
    }

    fn find_student(&self, _id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        offline()
    }

    fn update_student(
        &self,
        _id: &StudentId,
        _patch: &StudentPatch,
    ) -> Result<Student, RepositoryError> {
        offline()
    }

    fn delete_student(&self, _id: &StudentId) -> Result<Student, RepositoryError> {
        offline()
    }

    fn list_students(&self, _filter: &StudentFilter) -> Result<Vec<Student>, RepositoryError> {
        offline()
    }

    fn count_students(&self, _filter: &StudentFilter) -> Result<usize, RepositoryError> {
        offline()
    }

    fn place_students(
        &self,
        _ids: &[StudentId],
        _grant: &PlacementGrant,
    ) -> Result<Vec<Student>, RepositoryError> {
        offline()
    }

    fn insert_company(&self, _company: Company) -> Result<Company, RepositoryError> {
        offline()
    }

    fn find_company(&self, _id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        offline()
    }

    fn update_company(
        &self,
        _id: &CompanyId,
        _patch: &CompanyPatch,
    ) -> Result<Company, RepositoryError> {
        offline()
    }

    fn delete_company(&self, _id: &CompanyId) -> Result<Company, RepositoryError> {
        offline()
    }

    fn list_companies(&self, _filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError> {
        offline()
    }

    fn count_companies(&self, _filter: &CompanyFilter) -> Result<usize, RepositoryError> {
        offline()
    }
}

/// Shared store that registers `late` for the drive right before results are
/// committed, as a concurrent request would.
pub(super) struct LateRegistration {
    pub(super) inner: Arc<InMemoryPortalStore>,
    pub(super) late: StudentId,
}

impl SequenceAllocator for LateRegistration {
    fn next_number(&self, sequence: Sequence) -> Result<u64, RepositoryError> {
        self.inner.next_number(sequence)
    }
}

impl DriveStore for LateRegistration {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        self.inner.insert_drive(drive)
    }

    fn find_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        self.inner.find_drive(id)
    }

    fn replace_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        self.inner.replace_drive(drive)
    }

    fn complete_drive(
        &self,
        drive: Drive,
        grant: &PlacementGrant,
    ) -> Result<Drive, RepositoryError> {
        self.inner.add_registration(&drive.id, &self.late)?;
        self.inner.complete_drive(drive, grant)
    }

    fn add_registration(
        &self,
        id: &DriveId,
        student: &StudentId,
    ) -> Result<Registration, RepositoryError> {
        self.inner.add_registration(id, student)
    }

    fn delete_drive(&self, id: &DriveId) -> Result<Drive, RepositoryError> {
        self.inner.delete_drive(id)
    }

    fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, RepositoryError> {
        self.inner.list_drives(filter)
    }

    fn count_drives(&self, filter: &DriveFilter) -> Result<usize, RepositoryError> {
        self.inner.count_drives(filter)
    }
}

impl DirectoryStore for LateRegistration {
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError> {
        self.inner.insert_student(student)
    }

    fn insert_students(&self, students: Vec<Student>) -> Result<Vec<Student>, RepositoryError> {
        self.inner.insert_students(students)
    }

    fn find_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        self.inner.find_student(id)
    }

    fn update_student(
        &self,
        id: &StudentId,
        patch: &StudentPatch,
    ) -> Result<Student, RepositoryError> {
        self.inner.update_student(id, patch)
    }

    fn delete_student(&self, id: &StudentId) -> Result<Student, RepositoryError> {
        self.inner.delete_student(id)
    }

    fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, RepositoryError> {
        self.inner.list_students(filter)
    }

    fn count_students(&self, filter: &StudentFilter) -> Result<usize, RepositoryError> {
        self.inner.count_students(filter)
    }

    fn place_students(
        &self,
        ids: &[StudentId],
        grant: &PlacementGrant,
    ) -> Result<Vec<Student>, RepositoryError> {
        self.inner.place_students(ids, grant)
    }

    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        self.inner.insert_company(company)
    }

    fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        self.inner.find_company(id)
    }

    fn update_company(
        &self,
        id: &CompanyId,
        patch: &CompanyPatch,
    ) -> Result<Company, RepositoryError> {
        self.inner.update_company(id, patch)
    }

    fn delete_company(&self, id: &CompanyId) -> Result<Company, RepositoryError> {
        self.inner.delete_company(id)
    }

    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError> {
        self.inner.list_companies(filter)
    }

    fn count_companies(&self, filter: &CompanyFilter) -> Result<usize, RepositoryError> {
        self.inner.count_companies(filter)
    }
}
