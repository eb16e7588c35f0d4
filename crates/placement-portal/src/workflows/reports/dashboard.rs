use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{BranchPlacement, PackageStats};
use crate::workflows::directory::{Branch, Student, StudentId, StudentStatus};
use crate::workflows::drives::{Drive, DriveId, DriveStatus};

pub(crate) const RECENT_LIMIT: usize = 5;
pub(crate) const PARTICIPATION_LIMIT: usize = 10;
pub(crate) const TREND_MONTHS: i32 = 6;

/// Admin landing page counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub students: StudentTotals,
    pub companies: CompanyTotals,
    pub drives: DriveTotals,
    pub jobs: JobTotals,
    pub recent_activities: RecentActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentTotals {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub placed: usize,
    pub placement_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyTotals {
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DriveTotals {
    pub total: usize,
    pub scheduled: usize,
    pub ongoing: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl DriveTotals {
    pub fn tally(drives: &[Drive]) -> Self {
        drives.iter().fold(
            Self {
                total: drives.len(),
                ..Self::default()
            },
            |mut totals, drive| {
                match drive.status {
                    DriveStatus::Scheduled => totals.scheduled += 1,
                    DriveStatus::Ongoing => totals.ongoing += 1,
                    DriveStatus::Completed => totals.completed += 1,
                    DriveStatus::Cancelled => totals.cancelled += 1,
                }
                totals
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTotals {
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub drives: Vec<DriveSummary>,
    pub students: Vec<StudentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveSummary {
    pub id: DriveId,
    pub title: String,
    pub company_name: String,
    pub drive_date: NaiveDate,
    pub status: DriveStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
    pub branch: Branch,
    pub status: StudentStatus,
}

/// Latest created drives, newest first.
pub fn recent_drives(drives: &[Drive]) -> Vec<DriveSummary> {
    let mut recent: Vec<&Drive> = drives.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    recent
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|drive| DriveSummary {
            id: drive.id.clone(),
            title: drive.title.clone(),
            company_name: drive.company_name.clone(),
            drive_date: drive.drive_date,
            status: drive.status,
        })
        .collect()
}

/// Latest created students, newest first.
pub fn recent_students(students: &[Student]) -> Vec<StudentSummary> {
    let mut recent: Vec<&Student> = students.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    recent
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|student| StudentSummary {
            id: student.id.clone(),
            name: student.name.clone(),
            branch: student.branch,
            status: student.status,
        })
        .collect()
}

/// Placement analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementAnalytics {
    pub placements_by_branch: Vec<BranchPlacement>,
    pub company_participation: Vec<CompanyParticipation>,
    pub placement_trends: Vec<MonthlyTrend>,
    pub package_stats: PackageStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyParticipation {
    pub company: String,
    pub drives: usize,
    pub students_placed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub drives: usize,
}

/// Completed drives per calendar month for the six months ending with `today`'s month.
pub fn monthly_trends(drives: &[Drive], today: NaiveDate) -> Vec<MonthlyTrend> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..TREND_MONTHS)
        .rev()
        .filter_map(|offset| {
            let index = current - offset;
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) as u32 + 1;
            let start = NaiveDate::from_ymd_opt(year, month, 1)?;
            let count = drives
                .iter()
                .filter(|drive| drive.status == DriveStatus::Completed)
                .filter(|drive| drive.drive_date.year() == year && drive.drive_date.month() == month)
                .count();
            Some(MonthlyTrend {
                month: start.format("%b %Y").to_string(),
                drives: count,
            })
        })
        .collect()
}
