use serde::Serialize;

use super::domain::EligibilityCriteria;
use crate::workflows::directory::{Branch, Student};

/// Reason a student falls outside a drive's eligibility criteria.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Ineligibility {
    #[error("CGPA requirement not met (required {required:.2}, actual {actual:.2})")]
    CgpaBelowMinimum { required: f64, actual: f64 },
    #[error("branch {} is not eligible", branch.code())]
    BranchNotEligible { branch: Branch },
    #[error("too many backlogs (allowed {allowed}, actual {actual})")]
    TooManyBacklogs { allowed: u32, actual: u32 },
    #[error("tenth percentage requirement not met (required {required:.1})")]
    TenthBelowMinimum { required: f64, actual: Option<f64> },
    #[error("twelfth percentage requirement not met (required {required:.1})")]
    TwelfthBelowMinimum { required: f64, actual: Option<f64> },
}

/// Every failing criterion, in evaluation order: CGPA, branch, backlogs, school marks.
pub fn assess(criteria: &EligibilityCriteria, student: &Student) -> Vec<Ineligibility> {
    let mut failures = Vec::new();

    if student.cgpa < criteria.min_cgpa {
        failures.push(Ineligibility::CgpaBelowMinimum {
            required: criteria.min_cgpa,
            actual: student.cgpa,
        });
    }

    if !criteria.branches.contains(&student.branch) {
        failures.push(Ineligibility::BranchNotEligible {
            branch: student.branch,
        });
    }

    if student.backlogs > criteria.max_backlogs {
        failures.push(Ineligibility::TooManyBacklogs {
            allowed: criteria.max_backlogs,
            actual: student.backlogs,
        });
    }

    if let Some(required) = criteria.min_tenth_percentage {
        if !meets(student.tenth_percentage, required) {
            failures.push(Ineligibility::TenthBelowMinimum {
                required,
                actual: student.tenth_percentage,
            });
        }
    }

    if let Some(required) = criteria.min_twelfth_percentage {
        if !meets(student.twelfth_percentage, required) {
            failures.push(Ineligibility::TwelfthBelowMinimum {
                required,
                actual: student.twelfth_percentage,
            });
        }
    }

    failures
}

/// First failing criterion, if any.
pub fn check(criteria: &EligibilityCriteria, student: &Student) -> Result<(), Ineligibility> {
    match assess(criteria, student).into_iter().next() {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

// Missing marks never satisfy a configured minimum.
fn meets(actual: Option<f64>, required: f64) -> bool {
    actual.map_or(false, |value| value >= required)
}
