//! Job postings published by recruiting companies.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{JobFilter, JobId, JobPatch, JobPosting, JobType, NewJobPosting, PackageRange};
pub use repository::JobStore;
pub use router::job_router;
pub use service::{JobError, JobService};
