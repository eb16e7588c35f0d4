use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{JobFilter, JobId, JobPatch, JobPosting, NewJobPosting};
use super::repository::JobStore;
use crate::store::{RepositoryError, Sequence};
use crate::workflows::directory::{CompanyId, DirectoryStore};

pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> JobService<S>
where
    S: JobStore + DirectoryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: NewJobPosting) -> Result<JobPosting, JobError> {
        draft.validate().map_err(JobError::Invalid)?;
        let company = self
            .store
            .find_company(&draft.company)?
            .ok_or_else(|| JobError::CompanyNotFound(draft.company.clone()))?;
        let company_id = company.id.clone();

        let posting = JobPosting {
            id: JobId(self.store.next_id(Sequence::Job)?),
            company: company.id,
            company_name: company.name,
            title: draft.title.trim().to_string(),
            description: draft.description,
            role: draft.role,
            job_type: draft.job_type,
            location: draft.location,
            package: draft.package,
            skills_required: draft.skills_required,
            eligibility: draft.eligibility,
            application_deadline: draft.application_deadline,
            is_active: true,
            created_at: Utc::now(),
        };

        let posting = self.store.insert_job(posting).map_err(|err| match err {
            RepositoryError::NotFound => JobError::CompanyNotFound(company_id),
            other => other.into(),
        })?;
        info!(job_id = %posting.id, company_id = %posting.company, "job posted");
        Ok(posting)
    }

    pub fn get(&self, id: &JobId) -> Result<JobPosting, JobError> {
        self.store
            .find_job(id)?
            .ok_or_else(|| JobError::NotFound(id.clone()))
    }

    pub fn list(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, JobError> {
        Ok(self.store.list_jobs(filter)?)
    }

    pub fn update(&self, id: &JobId, patch: JobPatch) -> Result<JobPosting, JobError> {
        patch.validate().map_err(JobError::Invalid)?;
        let posting = self.store.update_job(id, &patch).map_err(|err| match err {
            RepositoryError::NotFound => JobError::NotFound(id.clone()),
            other => other.into(),
        })?;
        info!(job_id = %id, active = posting.is_active, "job updated");
        Ok(posting)
    }

    pub fn delete(&self, id: &JobId) -> Result<JobPosting, JobError> {
        let posting = self.store.delete_job(id).map_err(|err| match err {
            RepositoryError::NotFound => JobError::NotFound(id.clone()),
            other => other.into(),
        })?;
        info!(job_id = %id, "job deleted");
        Ok(posting)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for JobError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
