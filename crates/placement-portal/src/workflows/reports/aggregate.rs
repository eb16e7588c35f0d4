//! Pure aggregation over a student snapshot. Nothing here touches the store.

use std::collections::HashMap;

use super::domain::{BranchPlacement, CompanyPlacement, PackageStats, SalaryBucket, SalaryBucketCount};
use crate::workflows::directory::{Branch, Student};

/// Round to two decimal places, the precision reports are published with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `part` in `total` as a percentage; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Packages recorded on placed students. Students without a package are skipped.
pub fn placed_packages(students: &[Student]) -> Vec<f64> {
    students
        .iter()
        .filter(|student| student.is_placed())
        .filter_map(Student::placed_package)
        .collect()
}

/// Highest, lowest and average package; all 0 when no package is known.
pub fn package_stats(packages: &[f64]) -> PackageStats {
    if packages.is_empty() {
        return PackageStats::default();
    }
    let highest = packages.iter().copied().fold(f64::MIN, f64::max);
    let lowest = packages.iter().copied().fold(f64::MAX, f64::min);
    let average = packages.iter().sum::<f64>() / packages.len() as f64;
    PackageStats {
        highest,
        lowest,
        average: round2(average),
    }
}

/// Totals for the reported branches, in their fixed order.
pub fn branch_breakdown(students: &[Student]) -> Vec<BranchPlacement> {
    Branch::reported()
        .into_iter()
        .map(|branch| {
            let (total, placed) = students
                .iter()
                .filter(|student| student.branch == branch)
                .fold((0, 0), |(total, placed), student| {
                    (total + 1, placed + usize::from(student.is_placed()))
                });
            BranchPlacement {
                branch,
                total_students: total,
                placed_students: placed,
                percentage: percentage(placed, total),
            }
        })
        .collect()
}

/// Placed students grouped by the company name recorded on their placement,
/// largest group first and ties by name.
pub fn company_breakdown(students: &[Student]) -> Vec<CompanyPlacement> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for company in students.iter().filter_map(Student::placed_company) {
        *counts.entry(company).or_default() += 1;
    }

    let mut breakdown: Vec<CompanyPlacement> = counts
        .into_iter()
        .map(|(company, students_placed)| CompanyPlacement {
            company: company.to_string(),
            students_placed,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.students_placed
            .cmp(&a.students_placed)
            .then_with(|| a.company.cmp(&b.company))
    });
    breakdown
}

/// Histogram over every bucket, including empty ones.
pub fn salary_distribution(packages: &[f64]) -> Vec<SalaryBucketCount> {
    SalaryBucket::ordered()
        .into_iter()
        .map(|bucket| SalaryBucketCount {
            range: bucket.label().to_string(),
            count: packages
                .iter()
                .filter(|package| SalaryBucket::for_package(**package) == Some(bucket))
                .count(),
        })
        .collect()
}
