use super::domain::{
    Company, CompanyFilter, CompanyId, CompanyPatch, PlacementGrant, Student, StudentFilter,
    StudentId, StudentPatch,
};
use crate::store::{RepositoryError, SequenceAllocator};

/// Student and company profiles.
pub trait DirectoryStore: SequenceAllocator {
    /// Insert a new student; a taken id or e-mail is a `Conflict`.
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError>;
    /// Insert several students, all or none.
    fn insert_students(&self, students: Vec<Student>) -> Result<Vec<Student>, RepositoryError>;
    fn find_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn update_student(
        &self,
        id: &StudentId,
        patch: &StudentPatch,
    ) -> Result<Student, RepositoryError>;
    /// Remove the student unless a drive still lists it (`Referenced`).
    fn delete_student(&self, id: &StudentId) -> Result<Student, RepositoryError>;
    fn list_students(&self, filter: &StudentFilter) -> Result<Vec<Student>, RepositoryError>;
    fn count_students(&self, filter: &StudentFilter) -> Result<usize, RepositoryError>;
    /// Grant the placement to every listed student. Fails with `NotFound`
    /// without touching any record when one of the ids is unknown.
    fn place_students(
        &self,
        ids: &[StudentId],
        grant: &PlacementGrant,
    ) -> Result<Vec<Student>, RepositoryError>;

    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn update_company(
        &self,
        id: &CompanyId,
        patch: &CompanyPatch,
    ) -> Result<Company, RepositoryError>;
    /// Remove the company unless a drive or job posting belongs to it (`Referenced`).
    fn delete_company(&self, id: &CompanyId) -> Result<Company, RepositoryError>;
    fn list_companies(&self, filter: &CompanyFilter) -> Result<Vec<Company>, RepositoryError>;
    fn count_companies(&self, filter: &CompanyFilter) -> Result<usize, RepositoryError>;
}
