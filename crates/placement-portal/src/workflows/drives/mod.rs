//! Recruitment drives: eligibility gate, registration and result ingestion.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Drive, DriveFilter, DriveId, DriveResults, DriveRound, DriveStatus, DriveUpdate,
    EligibilityCriteria, NewDrive, RegistrationRequest, RoundType,
};
pub use eligibility::Ineligibility;
pub use repository::{DriveStore, Registration};
pub use router::drive_router;
pub use service::{DriveEligibility, DriveError, DriveService, MissingRecord, ResultsViolation};
