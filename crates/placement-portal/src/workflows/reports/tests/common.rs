use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::identity::{Principal, Role};
use crate::store::{InMemoryPortalStore, RepositoryError, Sequence, SequenceAllocator};
use crate::workflows::directory::{
    Branch, Company, CompanyFilter, CompanyId, CompanyPatch, DirectoryStore, NewCompany,
    NewStudent, PlacementGrant, Student, StudentFilter, StudentId, StudentPatch, StudentStatus,
};
use crate::workflows::drives::{
    Drive, DriveFilter, DriveId, DriveStatus, DriveStore, EligibilityCriteria, Registration,
};
use crate::workflows::jobs::{JobFilter, JobId, JobPatch, JobPosting, JobStore};
use crate::workflows::reports::{PlacementReport, ReportId, ReportRequest, ReportStore};

pub(super) fn admin() -> Principal {
    Principal::new("ADM0001", Role::Admin)
}

pub(super) fn request() -> ReportRequest {
    ReportRequest {
        academic_year: "2024-25".to_string(),
        semester: Some("Even".to_string()),
    }
}

pub(super) fn add_student(store: &InMemoryPortalStore, branch: Branch) -> Student {
    let number = store.next_number(Sequence::Student).expect("sequence");
    let draft = NewStudent {
        name: format!("Student {number}"),
        email: format!("student{number}@college.test"),
        branch,
        cgpa: 7.5,
        semester: Some(8),
        backlogs: 0,
        phone: None,
        resume_link: None,
        skills: Vec::new(),
        certifications: Vec::new(),
        tenth_percentage: None,
        twelfth_percentage: None,
        status: Some(StudentStatus::Approved),
    };
    store
        .insert_student(draft.into_student(StudentId(Sequence::Student.format(number)), Utc::now()))
        .expect("student inserted")
}

pub(super) fn place(store: &InMemoryPortalStore, student: &Student, company: &str, package: Option<f64>) {
    store
        .place_students(
            &[student.id.clone()],
            &PlacementGrant {
                company: company.to_string(),
                role: Some("Engineer".to_string()),
                package,
            },
        )
        .expect("placed");
}

pub(super) fn add_company(store: &InMemoryPortalStore, name: &str) -> Company {
    let id = CompanyId(store.next_id(Sequence::Company).expect("sequence"));
    let draft = NewCompany {
        name: name.to_string(),
        hr_name: "Recruiter".to_string(),
        hr_email: "jobs@company.test".to_string(),
        hr_phone: None,
        industry: None,
        website: None,
        address: None,
        roles: Vec::new(),
    };
    store
        .insert_company(draft.into_company(id, Utc::now()))
        .expect("company inserted")
}

pub(super) fn add_drive(
    store: &InMemoryPortalStore,
    company: &Company,
    drive_date: NaiveDate,
    status: DriveStatus,
) -> Drive {
    let now = Utc::now();
    let drive = Drive {
        id: DriveId(store.next_id(Sequence::Drive).expect("sequence")),
        company: company.id.clone(),
        company_name: company.name.clone(),
        title: format!("{} hiring", company.name),
        description: None,
        roles: vec!["Engineer".to_string()],
        eligibility: EligibilityCriteria {
            min_cgpa: 6.0,
            branches: Branch::all().to_vec(),
            max_backlogs: 0,
            min_tenth_percentage: None,
            min_twelfth_percentage: None,
        },
        drive_date,
        registration_deadline: None,
        venue: None,
        rounds: Vec::new(),
        registered_students: Vec::new(),
        shortlisted_students: Vec::new(),
        selected_students: Vec::new(),
        status,
        version: 0,
        created_at: now,
        updated_at: now,
    };
    store.insert_drive(drive).expect("drive inserted")
}

/// Delegates to an in-memory store but fails student reads on demand.
#[derive(Default)]
pub(super) struct FlakyStudentReads {
    pub(super) inner: InMemoryPortalStore,
    pub(super) failing: AtomicBool,
}

impl FlakyStudentReads {
    pub(super) fn failing() -> Arc<Self> {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        Arc::new(store)
    }
}

impl SequenceAllocator for FlakyStudentReads {
    fn next_number(&self, sequence: Sequence) -> Result<u64, RepositoryError> {
        self.inner.next_number(sequence)
    }
}

impl DirectoryStore for FlakyStudentReads {
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
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("read timed out".to_string()));
        }
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

impl DriveStore for FlakyStudentReads {
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

impl JobStore for FlakyStudentReads {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn find_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.inner.find_job(id)
    }

    fn update_job(&self, id: &JobId, patch: &JobPatch) -> Result<JobPosting, RepositoryError> {
        self.inner.update_job(id, patch)
    }

    fn delete_job(&self, id: &JobId) -> Result<JobPosting, RepositoryError> {
        self.inner.delete_job(id)
    }

    fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, RepositoryError> {
        self.inner.list_jobs(filter)
    }

    fn count_jobs(&self, filter: &JobFilter) -> Result<usize, RepositoryError> {
        self.inner.count_jobs(filter)
    }
}

impl ReportStore for FlakyStudentReads {
    fn insert_report(&self, report: PlacementReport) -> Result<PlacementReport, RepositoryError> {
        self.inner.insert_report(report)
    }

    fn find_report(&self, id: &ReportId) -> Result<Option<PlacementReport>, RepositoryError> {
        self.inner.find_report(id)
    }

    fn list_reports(&self) -> Result<Vec<PlacementReport>, RepositoryError> {
        self.inner.list_reports()
    }

    fn delete_report(&self, id: &ReportId) -> Result<PlacementReport, RepositoryError> {
        self.inner.delete_report(id)
    }
}
