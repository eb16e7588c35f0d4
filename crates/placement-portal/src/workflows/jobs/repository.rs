use super::domain::{JobFilter, JobId, JobPatch, JobPosting};
use crate::store::{RepositoryError, SequenceAllocator};

pub trait JobStore: SequenceAllocator {
    /// Insert a posting; `NotFound` when its company does not exist.
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn find_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn update_job(&self, id: &JobId, patch: &JobPatch) -> Result<JobPosting, RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<JobPosting, RepositoryError>;
    /// Matching postings, newest first.
    fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, RepositoryError>;
    fn count_jobs(&self, filter: &JobFilter) -> Result<usize, RepositoryError>;
}
