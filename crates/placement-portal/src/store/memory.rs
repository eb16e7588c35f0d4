use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::{RepositoryError, Sequence, SequenceAllocator};
use crate::workflows::directory::{
    Company, CompanyFilter, CompanyId, CompanyPatch, DirectoryStore, PlacementGrant, Student,
    StudentFilter, StudentId, StudentPatch,
};
use crate::workflows::drives::{Drive, DriveFilter, DriveId, DriveStore, Registration};
use crate::workflows::jobs::{JobFilter, JobId, JobPatch, JobPosting, JobStore};
use crate::workflows::reports::{PlacementReport, ReportId, ReportStore};

#[derive(Default)]
struct PortalState {
    sequences: HashMap<Sequence, u64>,
    students: BTreeMap<StudentId, Student>,
    companies: BTreeMap<CompanyId, Company>,
    drives: BTreeMap<DriveId, Drive>,
    jobs: BTreeMap<JobId, JobPosting>,
    reports: BTreeMap<ReportId, PlacementReport>,
}

impl PortalState {
    fn email_taken(&self, email: &str, except: Option<&StudentId>) -> bool {
        self.students
            .values()
            .any(|student| student.email == email && Some(&student.id) != except)
    }

    fn drives_listing(&self, student: &StudentId) -> usize {
        let filter = DriveFilter::referencing(student.clone());
        self.drives.values().filter(|drive| filter.matches(drive)).count()
    }

    fn company_references(&self, company: &CompanyId) -> usize {
        let drives = DriveFilter::for_company(company.clone());
        let jobs = JobFilter::for_company(company.clone());
        self.drives.values().filter(|drive| drives.matches(drive)).count()
            + self.jobs.values().filter(|job| jobs.matches(job)).count()
    }

    /// Callers check that every id exists first.
    fn grant_placements(&mut self, ids: &[StudentId], grant: &PlacementGrant) -> Vec<Student> {
        let mut placed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(student) = self.students.get_mut(id) {
                student.grant_placement(grant);
                placed.push(student.clone());
            }
        }
        placed
    }
}

/// Process-local store backing every workflow trait. One lock guards all
/// collections, so each trait method is atomic.
#[derive(Default)]
pub struct InMemoryPortalStore {
    state: Mutex<PortalState>,
}

impl InMemoryPortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, PortalState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl SequenceAllocator for InMemoryPortalStore {
    fn next_number(&self, sequence: Sequence) -> Result<u64, RepositoryError> {
        let mut state = self.state()?;
        let counter = state.sequences.entry(sequence).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

impl DirectoryStore for InMemoryPortalStore {
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut state = self.state()?;
        if state.students.contains_key(&student.id) || state.email_taken(&student.email, None) {
            return Err(RepositoryError::Conflict);
        }
        state.students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn insert_students(&self, students: Vec<Student>) -> Result<Vec<Student>, RepositoryError> {
        let mut state = self.state()?;
        for (index, student) in students.iter().enumerate() {
            let repeated_in_batch = students[..index]
                .iter()
                .any(|earlier| earlier.id == student.id || earlier.email == student.email);
            if repeated_in_batch
                || state.students.contains_key(&student.id)
                || state.email_taken(&student.email, None)
            {
                return Err(RepositoryError::Conflict);
            }
        }
        for student in &students {
            state.students.insert(student.id.clone(), student.clone());
        }
        Ok(students)
    }

    fn find_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        Ok(self.state()?.students.get(id).cloned())
    }

    fn update_student(
        &self,
        id: &StudentId,
        patch: &StudentPatch,
    ) -> Result<Student, RepositoryError> {
        let mut state = self.state()?;
        if let Some(email) = &patch.email {
            if state.email_taken(&email.trim().to_ascii_lowercase(), Some(id)) {
                return Err(RepositoryError::Conflict);
            }
        }
        let student = state.students.get_mut(id).ok_or(RepositoryError::NotFound)?;
        patch.apply(student);
        Ok(student.clone())
    }

    fn delete_student(&self, id: &StudentId) -> Result<Student, RepositoryError> {
        let mut state = self.state()?;
        if !state.students.contains_key(id) {
            return Err(RepositoryError::NotFound);
        }
        let references = state.drives_listing(id);
        if references > 0 {
            return Err(RepositoryError::Referenced(references));
        }
        state.students.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .students
            .values()
            .filter(|student| filter.matches(student))
            .cloned()
            .collect())
    }

    fn count_students(&self, filter: &StudentFilter) -> Result<usize, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .students
            .values()
            .filter(|student| filter.matches(student))
            .count())
    }

    fn place_students(
        &self,
        ids: &[StudentId],
        grant: &PlacementGrant,
    ) -> Result<Vec<Student>, RepositoryError> {
        let mut state = self.state()?;
        if ids.iter().any(|id| !state.students.contains_key(id)) {
            return Err(RepositoryError::NotFound);
        }
        Ok(state.grant_placements(ids, grant))
    }

    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut state = self.state()?;
        if state.companies.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        state.companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.state()?.companies.get(id).cloned())
    }

    fn update_company(
        &self,
        id: &CompanyId,
        patch: &CompanyPatch,
    ) -> Result<Company, RepositoryError> {
        let mut state = self.state()?;
        let company = state.companies.get_mut(id).ok_or(RepositoryError::NotFound)?;
        patch.apply(company);
        Ok(company.clone())
    }

    fn delete_company(&self, id: &CompanyId) -> Result<Company, RepositoryError> {
        let mut state = self.state()?;
        if !state.companies.contains_key(id) {
            return Err(RepositoryError::NotFound);
        }
        let references = state.company_references(id);
        if references > 0 {
            return Err(RepositoryError::Referenced(references));
        }
        state.companies.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .companies
            .values()
            .filter(|company| filter.matches(company))
            .cloned()
            .collect())
    }

    fn count_companies(&self, filter: &CompanyFilter) -> Result<usize, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .companies
            .values()
            .filter(|company| filter.matches(company))
            .count())
    }
}

impl DriveStore for InMemoryPortalStore {
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError> {
        let mut state = self.state()?;
        if !state.companies.contains_key(&drive.company) {
            return Err(RepositoryError::NotFound);
        }
        if state.drives.contains_key(&drive.id) {
            return Err(RepositoryError::Conflict);
        }
        state.drives.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn find_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        Ok(self.state()?.drives.get(id).cloned())
    }

    fn replace_drive(&self, mut drive: Drive) -> Result<Drive, RepositoryError> {
        let mut state = self.state()?;
        let stored = state
            .drives
            .get_mut(&drive.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != drive.version {
            return Err(RepositoryError::StaleVersion);
        }
        drive.version += 1;
        drive.updated_at = Utc::now();
        *stored = drive.clone();
        Ok(drive)
    }

    fn complete_drive(
        &self,
        mut drive: Drive,
        grant: &PlacementGrant,
    ) -> Result<Drive, RepositoryError> {
        let mut state = self.state()?;
        let stored_version = state
            .drives
            .get(&drive.id)
            .map(|stored| stored.version)
            .ok_or(RepositoryError::NotFound)?;
        if stored_version != drive.version
            || drive
                .selected_students
                .iter()
                .any(|id| !state.students.contains_key(id))
        {
            return Err(RepositoryError::StaleVersion);
        }

        state.grant_placements(&drive.selected_students, grant);
        drive.version += 1;
        drive.updated_at = Utc::now();
        state.drives.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn add_registration(
        &self,
        id: &DriveId,
        student: &StudentId,
    ) -> Result<Registration, RepositoryError> {
        let mut state = self.state()?;
        let student_known = state.students.contains_key(student);
        let drive = state.drives.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if !student_known {
            return Ok(Registration::StudentMissing);
        }
        if drive.status.is_terminal() {
            return Ok(Registration::Closed(drive.status));
        }
        if drive.registered_students.contains(student) {
            return Ok(Registration::AlreadyRegistered);
        }
        drive.registered_students.push(student.clone());
        drive.version += 1;
        drive.updated_at = Utc::now();
        Ok(Registration::Added)
    }

    fn delete_drive(&self, id: &DriveId) -> Result<Drive, RepositoryError> {
        self.state()?
            .drives
            .remove(id)
            .ok_or(RepositoryError::NotFound)
    }

    fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, RepositoryError> {
        let state = self.state()?;
        let mut drives: Vec<Drive> = state
            .drives
            .values()
            .filter(|drive| filter.matches(drive))
            .cloned()
            .collect();
        drives.sort_by(|a, b| b.drive_date.cmp(&a.drive_date).then_with(|| a.id.cmp(&b.id)));
        Ok(drives)
    }

    fn count_drives(&self, filter: &DriveFilter) -> Result<usize, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .drives
            .values()
            .filter(|drive| filter.matches(drive))
            .count())
    }
}

impl JobStore for InMemoryPortalStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut state = self.state()?;
        if !state.companies.contains_key(&job.company) {
            return Err(RepositoryError::NotFound);
        }
        if state.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        state.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn find_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.state()?.jobs.get(id).cloned())
    }

    fn update_job(&self, id: &JobId, patch: &JobPatch) -> Result<JobPosting, RepositoryError> {
        let mut state = self.state()?;
        let job = state.jobs.get_mut(id).ok_or(RepositoryError::NotFound)?;
        patch.apply(job);
        Ok(job.clone())
    }

    fn delete_job(&self, id: &JobId) -> Result<JobPosting, RepositoryError> {
        self.state()?.jobs.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, RepositoryError> {
        let state = self.state()?;
        let mut jobs: Vec<JobPosting> = state
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(jobs)
    }

    fn count_jobs(&self, filter: &JobFilter) -> Result<usize, RepositoryError> {
        let state = self.state()?;
        Ok(state.jobs.values().filter(|job| filter.matches(job)).count())
    }
}

impl ReportStore for InMemoryPortalStore {
    fn insert_report(&self, report: PlacementReport) -> Result<PlacementReport, RepositoryError> {
        let mut state = self.state()?;
        if state.reports.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        state.reports.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    fn find_report(&self, id: &ReportId) -> Result<Option<PlacementReport>, RepositoryError> {
        Ok(self.state()?.reports.get(id).cloned())
    }

    fn list_reports(&self) -> Result<Vec<PlacementReport>, RepositoryError> {
        let state = self.state()?;
        let mut reports: Vec<PlacementReport> = state.reports.values().cloned().collect();
        reports.sort_by(|a, b| {
            b.generated_at
                .cmp(&a.generated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(reports)
    }

    fn delete_report(&self, id: &ReportId) -> Result<PlacementReport, RepositoryError> {
        self.state()?
            .reports
            .remove(id)
            .ok_or(RepositoryError::NotFound)
    }
}
