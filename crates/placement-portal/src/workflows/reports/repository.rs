use super::domain::{PlacementReport, ReportId};
use crate::store::{RepositoryError, SequenceAllocator};

/// Report snapshots are insert-once and never updated.
pub trait ReportStore: SequenceAllocator {
    fn insert_report(&self, report: PlacementReport) -> Result<PlacementReport, RepositoryError>;
    fn find_report(&self, id: &ReportId) -> Result<Option<PlacementReport>, RepositoryError>;
    /// All reports, newest first.
    fn list_reports(&self) -> Result<Vec<PlacementReport>, RepositoryError>;
    fn delete_report(&self, id: &ReportId) -> Result<PlacementReport, RepositoryError>;
}
