//! Placement reports: aggregation over the student directory, persisted
//! snapshots, and the live dashboard views.

pub mod aggregate;
pub mod categories;
pub mod dashboard;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use categories::{FixedCategoryWeights, JobCategoryStrategy};
pub use dashboard::{DashboardStats, PlacementAnalytics};
pub use domain::{
    BranchPlacement, CompanyPlacement, JobCategoryShare, PackageStats, PlacementReport, ReportId,
    ReportRequest, SalaryBucket, SalaryBucketCount,
};
pub use repository::ReportStore;
pub use router::report_router;
pub use service::{ReportError, ReportService};
