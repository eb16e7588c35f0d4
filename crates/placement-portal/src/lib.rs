//! Placement cell back office: student and company directory, recruitment
//! drive lifecycle, job postings and point-in-time placement reports.

pub mod config;
pub mod error;
pub mod identity;
pub mod store;
pub mod telemetry;
pub mod workflows;
