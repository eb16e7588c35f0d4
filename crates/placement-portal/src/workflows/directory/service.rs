use std::io::Read;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Company, CompanyFilter, CompanyId, CompanyPatch, NewCompany, NewStudent, Student,
    StudentFilter, StudentId, StudentPatch, StudentStatus,
};
use super::import::{read_roster, RosterError};
use super::repository::DirectoryStore;
use crate::store::{RepositoryError, Sequence};

/// Admin operations over the student and company directory.
pub struct DirectoryService<S> {
    store: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: DirectoryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create_company(&self, draft: NewCompany) -> Result<Company, DirectoryError> {
        draft.validate().map_err(DirectoryError::Invalid)?;
        let id = CompanyId(self.store.next_id(Sequence::Company)?);
        let company = self
            .store
            .insert_company(draft.into_company(id, Utc::now()))?;
        info!(company_id = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    pub fn get_company(&self, id: &CompanyId) -> Result<Company, DirectoryError> {
        self.store
            .find_company(id)?
            .ok_or_else(|| DirectoryError::CompanyNotFound(id.clone()))
    }

    pub fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, DirectoryError> {
        Ok(self.store.list_companies(filter)?)
    }

    pub fn update_company(
        &self,
        id: &CompanyId,
        patch: CompanyPatch,
    ) -> Result<Company, DirectoryError> {
        patch.validate().map_err(DirectoryError::Invalid)?;
        self.store
            .update_company(id, &patch)
            .map_err(|err| not_found_as(err, DirectoryError::CompanyNotFound(id.clone())))
    }

    /// Companies that still own drives or job postings cannot be removed.
    pub fn delete_company(&self, id: &CompanyId) -> Result<Company, DirectoryError> {
        let company = self.store.delete_company(id).map_err(|err| match err {
            RepositoryError::Referenced(references) => {
                warn!(company_id = %id, references, "refusing to delete referenced company");
                DirectoryError::Referenced {
                    record: id.0.clone(),
                    references,
                }
            }
            other => not_found_as(other, DirectoryError::CompanyNotFound(id.clone())),
        })?;
        info!(company_id = %id, "company deleted");
        Ok(company)
    }

    pub fn create_student(&self, draft: NewStudent) -> Result<Student, DirectoryError> {
        draft.validate().map_err(DirectoryError::Invalid)?;
        let id = StudentId(self.store.next_id(Sequence::Student)?);
        let student = self
            .store
            .insert_student(draft.into_student(id, Utc::now()))?;
        info!(student_id = %student.id, branch = student.branch.code(), "student created");
        Ok(student)
    }

    /// Validate every draft first; nothing is stored unless all rows are valid.
    pub fn bulk_create_students(
        &self,
        drafts: Vec<NewStudent>,
    ) -> Result<Vec<Student>, DirectoryError> {
        for (index, draft) in drafts.iter().enumerate() {
            draft
                .validate()
                .map_err(|reason| DirectoryError::Invalid(format!("row {}: {reason}", index + 1)))?;
        }

        let created_at = Utc::now();
        let mut students = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = StudentId(self.store.next_id(Sequence::Student)?);
            students.push(draft.into_student(id, created_at));
        }

        let students = self.store.insert_students(students)?;
        info!(count = students.len(), "students created in bulk");
        Ok(students)
    }

    pub fn import_roster<R: Read>(&self, reader: R) -> Result<Vec<Student>, DirectoryError> {
        let drafts = read_roster(reader)?;
        self.bulk_create_students(drafts)
    }

    pub fn get_student(&self, id: &StudentId) -> Result<Student, DirectoryError> {
        self.store
            .find_student(id)?
            .ok_or_else(|| DirectoryError::StudentNotFound(id.clone()))
    }

    pub fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, DirectoryError> {
        Ok(self.store.list_students(filter)?)
    }

    pub fn update_student(
        &self,
        id: &StudentId,
        patch: StudentPatch,
    ) -> Result<Student, DirectoryError> {
        patch.validate().map_err(DirectoryError::Invalid)?;
        self.store
            .update_student(id, &patch)
            .map_err(|err| not_found_as(err, DirectoryError::StudentNotFound(id.clone())))
    }

    pub fn approve_student(&self, id: &StudentId) -> Result<Student, DirectoryError> {
        self.set_status(id, StudentStatus::Approved)
    }

    pub fn reject_student(&self, id: &StudentId) -> Result<Student, DirectoryError> {
        self.set_status(id, StudentStatus::Rejected)
    }

    pub fn disable_student(&self, id: &StudentId) -> Result<Student, DirectoryError> {
        self.set_status(id, StudentStatus::Disabled)
    }

    fn set_status(&self, id: &StudentId, status: StudentStatus) -> Result<Student, DirectoryError> {
        let student = self.update_student(id, StudentPatch::status(status))?;
        info!(student_id = %id, status = status.label(), "student status changed");
        Ok(student)
    }

    /// Students listed on any drive are kept; drives only hold weak references.
    pub fn delete_student(&self, id: &StudentId) -> Result<Student, DirectoryError> {
        let student = self.store.delete_student(id).map_err(|err| match err {
            RepositoryError::Referenced(references) => {
                warn!(student_id = %id, references, "refusing to delete referenced student");
                DirectoryError::Referenced {
                    record: id.0.clone(),
                    references,
                }
            }
            other => not_found_as(other, DirectoryError::StudentNotFound(id.clone())),
        })?;
        info!(student_id = %id, "student deleted");
        Ok(student)
    }
}

fn not_found_as(err: RepositoryError, not_found: DirectoryError) -> DirectoryError {
    match err {
        RepositoryError::NotFound => not_found,
        other => other.into(),
    }
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("a student with the same id or e-mail already exists")]
    Duplicate,
    #[error("{record} is still referenced by {references} record(s)")]
    Referenced { record: String, references: usize },
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for DirectoryError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Duplicate,
            RepositoryError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
