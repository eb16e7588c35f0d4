use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::aggregate;
use super::categories::{FixedCategoryWeights, JobCategoryStrategy};
use super::dashboard::{
    self, CompanyParticipation, CompanyTotals, DashboardStats, DriveTotals, JobTotals,
    PlacementAnalytics, RecentActivity, StudentTotals, PARTICIPATION_LIMIT,
};
use super::domain::{PlacementReport, ReportId, ReportRequest};
use super::repository::ReportStore;
use crate::identity::Principal;
use crate::store::{RepositoryError, Sequence};
use crate::workflows::directory::{
    CompanyFilter, DirectoryStore, Student, StudentFilter, StudentStatus,
};
use crate::workflows::drives::{DriveFilter, DriveStatus, DriveStore};
use crate::workflows::jobs::{JobFilter, JobStore};

/// Point-in-time placement reports plus the live dashboard views.
pub struct ReportService<S> {
    store: Arc<S>,
    categories: Arc<dyn JobCategoryStrategy>,
}

impl<S> ReportService<S>
where
    S: ReportStore + DirectoryStore + DriveStore + JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_strategy(store, Arc::new(FixedCategoryWeights::default()))
    }

    pub fn with_strategy(store: Arc<S>, categories: Arc<dyn JobCategoryStrategy>) -> Self {
        Self { store, categories }
    }

    /// Snapshot the current placement state into a new report. Every read
    /// happens before the single insert, so a failed read persists nothing.
    pub fn generate(
        &self,
        request: ReportRequest,
        generated_by: &Principal,
    ) -> Result<PlacementReport, ReportError> {
        request.validate().map_err(ReportError::Invalid)?;

        let students = read(self.store.list_students(&StudentFilter::default()))?;
        let companies_participated =
            read(self.store.count_companies(&CompanyFilter::active()))?;
        let drives_organized = read(
            self.store
                .count_drives(&DriveFilter::with_status(DriveStatus::Completed)),
        )?;

        let placed: Vec<&Student> = students.iter().filter(|s| s.is_placed()).collect();
        let packages = aggregate::placed_packages(&students);
        let stats = aggregate::package_stats(&packages);

        let report = PlacementReport {
            id: ReportId(self.store.next_id(Sequence::Report)?),
            academic_year: request.academic_year.trim().to_string(),
            semester: request.semester,
            total_students: students.len(),
            students_placed: placed.len(),
            companies_participated,
            drives_organized,
            highest_package: stats.highest,
            average_package: stats.average,
            lowest_package: stats.lowest,
            placements_by_branch: aggregate::branch_breakdown(&students),
            placements_by_company: aggregate::company_breakdown(&students),
            salary_distribution: aggregate::salary_distribution(&packages),
            job_categories: self.categories.categorize(&placed),
            generated_by: generated_by.id.clone(),
            generated_at: Utc::now(),
        };

        let report = self.store.insert_report(report)?;
        info!(
            report_id = %report.id,
            academic_year = %report.academic_year,
            total_students = report.total_students,
            students_placed = report.students_placed,
            "placement report generated"
        );
        Ok(report)
    }

    pub fn list(&self) -> Result<Vec<PlacementReport>, ReportError> {
        Ok(self.store.list_reports()?)
    }

    pub fn get(&self, id: &ReportId) -> Result<PlacementReport, ReportError> {
        self.store
            .find_report(id)?
            .ok_or_else(|| ReportError::NotFound(id.clone()))
    }

    pub fn delete(&self, id: &ReportId) -> Result<PlacementReport, ReportError> {
        let report = self.store.delete_report(id).map_err(|err| match err {
            RepositoryError::NotFound => ReportError::NotFound(id.clone()),
            other => other.into(),
        })?;
        info!(report_id = %id, "placement report deleted");
        Ok(report)
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats, ReportError> {
        let students = read(self.store.list_students(&StudentFilter::default()))?;
        let drives = read(self.store.list_drives(&DriveFilter::default()))?;
        let companies = read(self.store.count_companies(&CompanyFilter::default()))?;
        let active_companies = read(self.store.count_companies(&CompanyFilter::active()))?;
        let active_jobs = read(self.store.count_jobs(&JobFilter::active()))?;

        let with_status = |status: StudentStatus| {
            students
                .iter()
                .filter(|student| student.status == status)
                .count()
        };
        let placed = students.iter().filter(|student| student.is_placed()).count();

        Ok(DashboardStats {
            students: StudentTotals {
                total: students.len(),
                approved: with_status(StudentStatus::Approved),
                pending: with_status(StudentStatus::Pending),
                placed,
                placement_percentage: aggregate::percentage(placed, students.len()),
            },
            companies: CompanyTotals {
                total: companies,
                active: active_companies,
            },
            drives: DriveTotals::tally(&drives),
            jobs: JobTotals {
                active: active_jobs,
            },
            recent_activities: RecentActivity {
                drives: dashboard::recent_drives(&drives),
                students: dashboard::recent_students(&students),
            },
        })
    }

    pub fn analytics(&self, today: NaiveDate) -> Result<PlacementAnalytics, ReportError> {
        let students = read(self.store.list_students(&StudentFilter::default()))?;
        let drives = read(self.store.list_drives(&DriveFilter::default()))?;
        let companies = read(self.store.list_companies(&CompanyFilter::active()))?;

        let company_participation = companies
            .into_iter()
            .take(PARTICIPATION_LIMIT)
            .map(|company| CompanyParticipation {
                drives: drives
                    .iter()
                    .filter(|drive| {
                        drive.company == company.id && drive.status == DriveStatus::Completed
                    })
                    .count(),
                students_placed: students
                    .iter()
                    .filter(|student| student.placed_company() == Some(company.name.as_str()))
                    .count(),
                company: company.name,
            })
            .collect();

        Ok(PlacementAnalytics {
            placements_by_branch: aggregate::branch_breakdown(&students),
            company_participation,
            placement_trends: dashboard::monthly_trends(&drives, today),
            package_stats: aggregate::package_stats(&aggregate::placed_packages(&students)),
        })
    }
}

fn read<T>(result: Result<T, RepositoryError>) -> Result<T, ReportError> {
    result.map_err(|err| {
        warn!(error = %err, "report read failed");
        ReportError::from(err)
    })
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("report {0} not found")]
    NotFound(ReportId),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for ReportError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
