use super::aggregate::percentage;
use super::domain::JobCategoryShare;
use crate::workflows::directory::Student;

/// Splits placed students into job categories for a report.
pub trait JobCategoryStrategy: Send + Sync {
    fn categorize(&self, placed: &[&Student]) -> Vec<JobCategoryShare>;
}

/// Fixed percentage split applied to the placed head count, rounded down.
///
/// Placement records do not carry a job category, so the default weights are
/// an estimate: IT/Software 45, Core Engineering 25, Consulting 15, Finance 10
/// and Others 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCategoryWeights {
    weights: Vec<(String, u32)>,
}

impl FixedCategoryWeights {
    pub fn new(weights: Vec<(String, u32)>) -> Self {
        Self { weights }
    }
}

impl Default for FixedCategoryWeights {
    fn default() -> Self {
        Self::new(
            [
                ("IT/Software", 45),
                ("Core Engineering", 25),
                ("Consulting", 15),
                ("Finance", 10),
                ("Others", 5),
            ]
            .into_iter()
            .map(|(category, weight)| (category.to_string(), weight))
            .collect(),
        )
    }
}

impl JobCategoryStrategy for FixedCategoryWeights {
    fn categorize(&self, placed: &[&Student]) -> Vec<JobCategoryShare> {
        let placed = placed.len();
        self.weights
            .iter()
            .map(|(category, weight)| JobCategoryShare {
                category: category.clone(),
                count: placed * *weight as usize / 100,
                percentage: percentage(*weight as usize, 100),
            })
            .collect()
    }
}
