use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::Branch;

/// Display identifier for generated reports, e.g. `RPT0002`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Salary histogram buckets in LPA, half-open `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBucket {
    UpToThree,
    ThreeToFive,
    FiveToSeven,
    SevenToTen,
    TenPlus,
}

impl SalaryBucket {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::UpToThree,
            Self::ThreeToFive,
            Self::FiveToSeven,
            Self::SevenToTen,
            Self::TenPlus,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpToThree => "0-3 LPA",
            Self::ThreeToFive => "3-5 LPA",
            Self::FiveToSeven => "5-7 LPA",
            Self::SevenToTen => "7-10 LPA",
            Self::TenPlus => "10+ LPA",
        }
    }

    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::UpToThree => (0.0, 3.0),
            Self::ThreeToFive => (3.0, 5.0),
            Self::FiveToSeven => (5.0, 7.0),
            Self::SevenToTen => (7.0, 10.0),
            Self::TenPlus => (10.0, f64::INFINITY),
        }
    }

    /// Bucket holding `package`. Negative or non-finite packages have none.
    pub fn for_package(package: f64) -> Option<Self> {
        Self::ordered().into_iter().find(|bucket| {
            let (lower, upper) = bucket.bounds();
            package >= lower && package < upper
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPlacement {
    pub branch: Branch,
    pub total_students: usize,
    pub placed_students: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPlacement {
    pub company: String,
    pub students_placed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBucketCount {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Highest, lowest and mean package over placed students with a known package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageStats {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
}

/// Immutable point-in-time placement snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub id: ReportId,
    pub academic_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub total_students: usize,
    pub students_placed: usize,
    pub companies_participated: usize,
    pub drives_organized: usize,
    pub highest_package: f64,
    pub average_package: f64,
    pub lowest_package: f64,
    pub placements_by_branch: Vec<BranchPlacement>,
    pub placements_by_company: Vec<CompanyPlacement>,
    pub salary_distribution: Vec<SalaryBucketCount>,
    pub job_categories: Vec<JobCategoryShare>,
    pub generated_by: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub academic_year: String,
    #[serde(default)]
    pub semester: Option<String>,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.academic_year.trim().is_empty() {
            return Err("academic year is required".to_string());
        }
        Ok(())
    }
}
