//! Student and company profiles owned by the placement cell.

pub mod domain;
mod import;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{
    Branch, Company, CompanyFilter, CompanyId, CompanyPatch, CompanyStatus, NewCompany,
    NewStudent, Placement, PlacementGrant, Student, StudentFilter, StudentId, StudentPatch,
    StudentStatus,
};
pub use import::{read_roster, RosterError};
pub use repository::DirectoryStore;
pub use router::directory_router;
pub use service::{DirectoryError, DirectoryService};
