use super::domain::{Drive, DriveFilter, DriveId, DriveStatus};
use crate::store::{RepositoryError, SequenceAllocator};
use crate::workflows::directory::{PlacementGrant, StudentId};

/// Outcome of the registration set-add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    AlreadyRegistered,
    /// The drive reached a terminal status.
    Closed(DriveStatus),
    /// The student record no longer exists.
    StudentMissing,
}

/// Drive persistence. Writes are conditional so concurrent requests never lose updates.
pub trait DriveStore: SequenceAllocator {
    /// Insert a drive; `NotFound` when its company does not exist.
    fn insert_drive(&self, drive: Drive) -> Result<Drive, RepositoryError>;
    fn find_drive(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;
    /// Replace the stored drive when its version still equals `drive.version`,
    /// returning the record with the bumped version. Otherwise `StaleVersion`.
    fn replace_drive(&self, drive: Drive) -> Result<Drive, RepositoryError>;
    /// Write the drive and grant the placement to each of its selected
    /// students in one step. `StaleVersion` when the drive changed since it
    /// was read or a selected student is gone; nothing is written then.
    fn complete_drive(
        &self,
        drive: Drive,
        grant: &PlacementGrant,
    ) -> Result<Drive, RepositoryError>;
    /// Append `student` to the registered list of an open drive unless
    /// already present. `NotFound` only when the drive is missing.
    fn add_registration(
        &self,
        id: &DriveId,
        student: &StudentId,
    ) -> Result<Registration, RepositoryError>;
    fn delete_drive(&self, id: &DriveId) -> Result<Drive, RepositoryError>;
    fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, RepositoryError>;
    fn count_drives(&self, filter: &DriveFilter) -> Result<usize, RepositoryError>;
}
