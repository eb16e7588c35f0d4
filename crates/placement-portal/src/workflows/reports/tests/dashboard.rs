use std::sync::Arc;

use chrono::NaiveDate;

use super::common::*;
use crate::store::InMemoryPortalStore;
use crate::workflows::directory::{Branch, DirectoryStore, StudentPatch, StudentStatus};
use crate::workflows::drives::DriveStatus;
use crate::workflows::reports::dashboard::monthly_trends;
use crate::workflows::reports::ReportService;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn stats_count_students_companies_drives_and_jobs() {
    let store = Arc::new(InMemoryPortalStore::new());
    let acme = add_company(&store, "Acme Systems");
    let students: Vec<_> = (0..4).map(|_| add_student(&store, Branch::Cse)).collect();
    store
        .update_student(&students[3].id, &StudentPatch::status(StudentStatus::Pending))
        .expect("pending");
    place(&store, &students[0], "Acme Systems", Some(6.0));
    add_drive(&store, &acme, day(2025, 1, 5), DriveStatus::Completed);
    add_drive(&store, &acme, day(2025, 2, 5), DriveStatus::Ongoing);
    add_drive(&store, &acme, day(2025, 3, 5), DriveStatus::Scheduled);

    let stats = ReportService::new(store)
        .dashboard_stats()
        .expect("stats");

    assert_eq!(stats.students.total, 4);
    assert_eq!(stats.students.approved, 3);
    assert_eq!(stats.students.pending, 1);
    assert_eq!(stats.students.placed, 1);
    assert_eq!(stats.students.placement_percentage, 25.0);
    assert_eq!(stats.companies.total, 1);
    assert_eq!(stats.companies.active, 1);
    assert_eq!(stats.drives.total, 3);
    assert_eq!(stats.drives.completed, 1);
    assert_eq!(stats.drives.ongoing, 1);
    assert_eq!(stats.drives.scheduled, 1);
    assert_eq!(stats.jobs.active, 0);
    assert_eq!(stats.recent_activities.drives.len(), 3);
    assert_eq!(stats.recent_activities.students.len(), 4);
}

#[test]
fn stats_on_an_empty_portal_avoid_division_by_zero() {
    let stats = ReportService::new(Arc::new(InMemoryPortalStore::new()))
        .dashboard_stats()
        .expect("stats");

    assert_eq!(stats.students.total, 0);
    assert_eq!(stats.students.placement_percentage, 0.0);
    assert!(stats.recent_activities.students.is_empty());
}

#[test]
fn recent_students_are_capped_at_five() {
    let store = Arc::new(InMemoryPortalStore::new());
    for _ in 0..7 {
        add_student(&store, Branch::Ece);
    }

    let stats = ReportService::new(store).dashboard_stats().expect("stats");
    assert_eq!(stats.recent_activities.students.len(), 5);
}

#[test]
fn analytics_report_participation_per_active_company() {
    let store = Arc::new(InMemoryPortalStore::new());
    let acme = add_company(&store, "Acme Systems");
    add_company(&store, "Globex");
    let student = add_student(&store, Branch::Civil);
    place(&store, &student, "Acme Systems", Some(12.0));
    add_drive(&store, &acme, day(2025, 4, 1), DriveStatus::Completed);
    add_drive(&store, &acme, day(2025, 5, 1), DriveStatus::Cancelled);

    let analytics = ReportService::new(store)
        .analytics(day(2025, 6, 15))
        .expect("analytics");

    let acme_row = analytics
        .company_participation
        .iter()
        .find(|row| row.company == "Acme Systems")
        .expect("acme listed");
    assert_eq!(acme_row.drives, 1);
    assert_eq!(acme_row.students_placed, 1);
    assert_eq!(analytics.company_participation.len(), 2);
    assert_eq!(analytics.package_stats.highest, 12.0);
    assert_eq!(analytics.placement_trends.len(), 6);
}

#[test]
fn trends_cover_six_months_across_a_year_boundary() {
    let store = InMemoryPortalStore::new();
    let acme = add_company(&store, "Acme Systems");
    let drives = vec![
        add_drive(&store, &acme, day(2024, 11, 20), DriveStatus::Completed),
        add_drive(&store, &acme, day(2025, 2, 3), DriveStatus::Completed),
        add_drive(&store, &acme, day(2025, 2, 21), DriveStatus::Completed),
        add_drive(&store, &acme, day(2025, 2, 25), DriveStatus::Scheduled),
        add_drive(&store, &acme, day(2024, 6, 1), DriveStatus::Completed),
    ];

    let trends = monthly_trends(&drives, day(2025, 3, 9));

    let months: Vec<&str> = trends.iter().map(|trend| trend.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025"]
    );
    let counts: Vec<usize> = trends.iter().map(|trend| trend.drives).collect();
    assert_eq!(counts, vec![0, 1, 0, 0, 2, 0]);
}
