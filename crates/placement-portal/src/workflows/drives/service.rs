use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    dedupe, Drive, DriveFilter, DriveId, DriveResults, DriveStatus, DriveUpdate, NewDrive,
};
use super::eligibility::{self, Ineligibility};
use super::repository::{DriveStore, Registration};
use crate::config::PortalConfig;
use crate::store::{RepositoryError, Sequence};
use crate::workflows::directory::{
    CompanyId, DirectoryStore, PlacementGrant, StudentId, StudentStatus,
};

/// Drive lifecycle: creation, registration, result ingestion and removal.
pub struct DriveService<S> {
    store: Arc<S>,
    enforce_result_subsets: bool,
}

impl<S> DriveService<S>
where
    S: DriveStore + DirectoryStore + 'static,
{
    pub fn new(store: Arc<S>, config: &PortalConfig) -> Self {
        Self {
            store,
            enforce_result_subsets: config.enforce_result_subsets,
        }
    }

    pub fn create(&self, draft: NewDrive) -> Result<Drive, DriveError> {
        draft.validate().map_err(DriveError::Invalid)?;
        let company = self
            .store
            .find_company(&draft.company)?
            .ok_or_else(|| DriveError::NotFound(MissingRecord::Company(draft.company.clone())))?;

        let company_id = company.id.clone();
        let id = DriveId(self.store.next_id(Sequence::Drive)?);
        let now = Utc::now();
        let drive = Drive {
            id,
            company: company.id,
            company_name: company.name,
            title: draft.title.trim().to_string(),
            description: draft.description,
            roles: draft.roles,
            eligibility: draft.eligibility,
            drive_date: draft.drive_date,
            registration_deadline: draft.registration_deadline,
            venue: draft.venue,
            rounds: draft.rounds,
            registered_students: Vec::new(),
            shortlisted_students: Vec::new(),
            selected_students: Vec::new(),
            status: DriveStatus::Scheduled,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let drive = self.store.insert_drive(drive).map_err(|err| match err {
            RepositoryError::NotFound => {
                DriveError::NotFound(MissingRecord::Company(company_id.clone()))
            }
            other => other.into(),
        })?;
        info!(drive_id = %drive.id, company_id = %drive.company, "drive created");
        Ok(drive)
    }

    pub fn get(&self, id: &DriveId) -> Result<Drive, DriveError> {
        self.store
            .find_drive(id)?
            .ok_or_else(|| DriveError::NotFound(MissingRecord::Drive(id.clone())))
    }

    pub fn list(&self, filter: &DriveFilter) -> Result<Vec<Drive>, DriveError> {
        Ok(self.store.list_drives(filter)?)
    }

    /// Checks run in order: existence, open drive, approval, criteria, then
    /// the atomic set-add that rejects duplicates.
    pub fn register_student(
        &self,
        drive_id: &DriveId,
        student_id: &StudentId,
    ) -> Result<Drive, DriveError> {
        let drive = self.get(drive_id)?;
        let student = self
            .store
            .find_student(student_id)?
            .ok_or_else(|| DriveError::NotFound(MissingRecord::Student(student_id.clone())))?;

        if drive.status.is_terminal() {
            return Err(registration_closed(drive_id, student_id, drive.status));
        }

        if student.status != StudentStatus::Approved {
            warn!(drive_id = %drive_id, student_id = %student_id, status = student.status.label(), "registration rejected: student not approved");
            return Err(DriveError::IneligibleStatus {
                student: student_id.clone(),
                status: student.status,
            });
        }

        if let Err(reason) = eligibility::check(&drive.eligibility, &student) {
            warn!(drive_id = %drive_id, student_id = %student_id, %reason, "registration rejected: criteria");
            return Err(DriveError::IneligibleCriteria {
                student: student_id.clone(),
                reason,
            });
        }

        let outcome = self
            .store
            .add_registration(drive_id, student_id)
            .map_err(|err| drive_error(err, drive_id))?;
        match outcome {
            Registration::Added => {}
            Registration::AlreadyRegistered => {
                warn!(drive_id = %drive_id, student_id = %student_id, "duplicate registration");
                return Err(DriveError::AlreadyRegistered {
                    drive: drive_id.clone(),
                    student: student_id.clone(),
                });
            }
            Registration::Closed(status) => {
                return Err(registration_closed(drive_id, student_id, status));
            }
            Registration::StudentMissing => {
                return Err(DriveError::NotFound(MissingRecord::Student(
                    student_id.clone(),
                )));
            }
        }

        info!(drive_id = %drive_id, student_id = %student_id, "student registered");
        self.get(drive_id)
    }

    /// Record shortlist and selections, place the selected students and
    /// complete the drive in one store write. Repeating the call with the same
    /// input changes nothing.
    pub fn submit_results(
        &self,
        drive_id: &DriveId,
        results: DriveResults,
    ) -> Result<Drive, DriveError> {
        if let Some(package) = results.package {
            if !package.is_finite() || package < 0.0 {
                return Err(DriveError::Invalid(format!(
                    "package must be a non-negative amount, got {package}"
                )));
            }
        }

        let mut drive = self.get(drive_id)?;
        if drive.status == DriveStatus::Cancelled {
            return Err(DriveError::InvalidTransition {
                from: drive.status,
                to: DriveStatus::Completed,
            });
        }

        let shortlisted = dedupe(&results.shortlisted_students);
        let selected = dedupe(&results.selected_students);
        if self.enforce_result_subsets {
            check_subsets(&drive, &shortlisted, &selected)?;
        }

        for student_id in &selected {
            if self.store.find_student(student_id)?.is_none() {
                return Err(DriveError::NotFound(MissingRecord::Student(
                    student_id.clone(),
                )));
            }
        }

        let grant = PlacementGrant {
            company: drive.company_name.clone(),
            role: drive.roles.first().cloned(),
            package: results.package,
        };
        drive.shortlisted_students = shortlisted;
        drive.selected_students = selected;
        drive.status = DriveStatus::Completed;
        let drive = self
            .store
            .complete_drive(drive, &grant)
            .map_err(|err| drive_error(err, drive_id))?;

        info!(
            drive_id = %drive.id,
            shortlisted = drive.shortlisted_students.len(),
            selected = drive.selected_students.len(),
            "drive results recorded"
        );
        Ok(drive)
    }

    /// Administrator edits. Status changes follow the drive state machine and
    /// completion is only reachable through [`DriveService::submit_results`].
    pub fn update(&self, drive_id: &DriveId, update: DriveUpdate) -> Result<Drive, DriveError> {
        update.validate().map_err(DriveError::Invalid)?;
        let mut drive = self.get(drive_id)?;

        if let Some(next) = update.status {
            let completing = next == DriveStatus::Completed && drive.status != next;
            if completing || !drive.status.can_transition_to(next) {
                return Err(DriveError::InvalidTransition {
                    from: drive.status,
                    to: next,
                });
            }
        }

        update.apply(&mut drive);
        if let Some(deadline) = drive.registration_deadline {
            if deadline > drive.drive_date {
                return Err(DriveError::Invalid(format!(
                    "registration deadline {deadline} falls after drive date {}",
                    drive.drive_date
                )));
            }
        }

        let drive = self
            .store
            .replace_drive(drive)
            .map_err(|err| drive_error(err, drive_id))?;
        info!(drive_id = %drive.id, status = drive.status.label(), "drive updated");
        Ok(drive)
    }

    /// Removes the drive. Placements already granted stay on the students.
    pub fn delete(&self, drive_id: &DriveId) -> Result<Drive, DriveError> {
        let drive = self
            .store
            .delete_drive(drive_id)
            .map_err(|err| drive_error(err, drive_id))?;
        info!(drive_id = %drive_id, "drive deleted");
        Ok(drive)
    }

    /// Open drives with the student's standing against each one.
    pub fn eligible_drives(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<DriveEligibility>, DriveError> {
        let student = self
            .store
            .find_student(student_id)?
            .ok_or_else(|| DriveError::NotFound(MissingRecord::Student(student_id.clone())))?;

        let drives = self.store.list_drives(&DriveFilter::default())?;
        Ok(drives
            .into_iter()
            .filter(|drive| !drive.status.is_terminal())
            .map(|drive| {
                let reasons = eligibility::assess(&drive.eligibility, &student);
                DriveEligibility {
                    eligible: student.status == StudentStatus::Approved && reasons.is_empty(),
                    registered: drive.is_registered(student_id),
                    drive_id: drive.id,
                    title: drive.title,
                    company_name: drive.company_name,
                    drive_date: drive.drive_date,
                    status: drive.status,
                    reasons,
                }
            })
            .collect())
    }
}

fn registration_closed(drive_id: &DriveId, student_id: &StudentId, status: DriveStatus) -> DriveError {
    warn!(drive_id = %drive_id, student_id = %student_id, status = status.label(), "registration rejected: drive closed");
    DriveError::RegistrationClosed {
        drive: drive_id.clone(),
        status,
    }
}

fn drive_error(err: RepositoryError, drive_id: &DriveId) -> DriveError {
    match err {
        RepositoryError::NotFound => DriveError::NotFound(MissingRecord::Drive(drive_id.clone())),
        RepositoryError::StaleVersion => DriveError::ConcurrentModification(drive_id.clone()),
        other => other.into(),
    }
}

fn check_subsets(
    drive: &Drive,
    shortlisted: &[StudentId],
    selected: &[StudentId],
) -> Result<(), DriveError> {
    if let Some(student) = shortlisted.iter().find(|id| !drive.is_registered(id)) {
        return Err(DriveError::InconsistentResults(
            ResultsViolation::NotRegistered(student.clone()),
        ));
    }
    if let Some(student) = selected.iter().find(|id| !shortlisted.contains(id)) {
        return Err(DriveError::InconsistentResults(
            ResultsViolation::NotShortlisted(student.clone()),
        ));
    }
    Ok(())
}

/// A student's standing against one open drive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveEligibility {
    pub drive_id: DriveId,
    pub title: String,
    pub company_name: String,
    pub drive_date: NaiveDate,
    pub status: DriveStatus,
    pub registered: bool,
    pub eligible: bool,
    pub reasons: Vec<Ineligibility>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingRecord {
    #[error("drive {0} not found")]
    Drive(DriveId),
    #[error("student {0} not found")]
    Student(StudentId),
    #[error("company {0} not found")]
    Company(CompanyId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultsViolation {
    #[error("student {0} is shortlisted but not registered for the drive")]
    NotRegistered(StudentId),
    #[error("student {0} is selected but not shortlisted")]
    NotShortlisted(StudentId),
}

/// Error raised by drive lifecycle operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriveError {
    #[error(transparent)]
    NotFound(MissingRecord),
    #[error("student {student} is not approved (status {})", status.label())]
    IneligibleStatus {
        student: StudentId,
        status: StudentStatus,
    },
    #[error("student {student} is not eligible: {reason}")]
    IneligibleCriteria {
        student: StudentId,
        reason: Ineligibility,
    },
    #[error("student {student} is already registered for drive {drive}")]
    AlreadyRegistered { drive: DriveId, student: StudentId },
    #[error("drive {drive} is {} and no longer accepts registrations", status.label())]
    RegistrationClosed { drive: DriveId, status: DriveStatus },
    #[error("inconsistent results: {0}")]
    InconsistentResults(ResultsViolation),
    #[error("drive cannot move from {} to {}", from.label(), to.label())]
    InvalidTransition { from: DriveStatus, to: DriveStatus },
    #[error("drive {0} was modified concurrently; retry the request")]
    ConcurrentModification(DriveId),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for DriveError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
