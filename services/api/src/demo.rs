use crate::infra::{PortalServices, BOOTSTRAP_ADMIN_ID};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use placement_portal::config::PortalConfig;
use placement_portal::error::AppError;
use placement_portal::identity::{Principal, Role};
use placement_portal::workflows::directory::{
    read_roster, Branch, DirectoryError, NewCompany, Student, StudentFilter, StudentStatus,
};
use placement_portal::workflows::drives::{Drive, DriveResults, EligibilityCriteria, NewDrive};
use placement_portal::workflows::reports::{PlacementReport, ReportRequest};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

const SAMPLE_ROSTER: &str = "\
name,email,branch,cgpa,semester,backlogs,tenth_percentage,twelfth_percentage,skills
Asha Raman,asha.raman@college.test,CSE,8.9,8,0,94.2,91.0,Rust;SQL
Vikram Nair,vikram.nair@college.test,CSE,7.4,8,0,88.0,84.5,Java
Priya Menon,priya.menon@college.test,IT,8.1,8,0,90.4,89.0,Python;Docker
Rahul Das,rahul.das@college.test,ECE,7.9,8,1,85.0,80.0,Embedded C
Neha Kulkarni,neha.kulkarni@college.test,CSE,6.2,8,2,78.0,74.0,JavaScript
Arjun Pillai,arjun.pillai@college.test,MECH,7.1,8,0,82.6,79.3,CAD
Sara Thomas,sara.thomas@college.test,IT,8.4,8,0,92.0,90.1,Go;Kubernetes
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Student roster CSV to seed the demo with. Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Academic year recorded on the generated report.
    #[arg(long, default_value = "2025-26")]
    pub(crate) academic_year: String,
    /// Override the demo date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print every student record after the drive completes.
    #[arg(long)]
    pub(crate) list_students: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterCheckArgs {
    /// Roster CSV to validate
    pub(crate) path: PathBuf,
}

/// Validate a roster offline and summarise it per branch.
pub(crate) fn run_roster_check(args: RosterCheckArgs) -> Result<(), AppError> {
    let file = File::open(&args.path)?;
    let drafts = read_roster(file).map_err(DirectoryError::from)?;

    let mut invalid = 0usize;
    let mut per_branch: BTreeMap<Branch, usize> = BTreeMap::new();
    for (index, draft) in drafts.iter().enumerate() {
        if let Err(reason) = draft.validate() {
            invalid += 1;
            println!("  row {}: {} ({reason})", index + 1, draft.email);
        }
        *per_branch.entry(draft.branch).or_default() += 1;
    }

    println!("Roster {}", args.path.display());
    println!("- {} students | {} invalid rows", drafts.len(), invalid);
    for (branch, count) in per_branch {
        println!("  - {}: {}", branch.code(), count);
    }

    if invalid > 0 {
        return Err(DirectoryError::Invalid(format!("{invalid} roster row(s) failed validation")).into());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster,
        academic_year,
        today,
        list_students,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let services = PortalServices::in_memory(&PortalConfig::default());
    let admin = Principal::new(BOOTSTRAP_ADMIN_ID, Role::Admin);

    println!("Placement portal demo ({today})");

    let students = match roster {
        Some(path) => services.directory.import_roster(File::open(path)?)?,
        None => services.directory.import_roster(SAMPLE_ROSTER.as_bytes())?,
    };
    println!("- Imported {} students (all pending approval)", students.len());

    // leave the last student pending to show the approval gate
    let (pending, to_approve) = match students.split_last() {
        Some((last, rest)) => (Some(last), rest),
        None => (None, &students[..]),
    };
    for student in to_approve {
        services.directory.approve_student(&student.id)?;
    }
    println!("- Approved {} students", to_approve.len());

    let acme = services.directory.create_company(demo_company(
        "Acme Systems",
        "Meena Iyer",
        "campus@acme.test",
        "Software",
    ))?;
    let northwind = services.directory.create_company(demo_company(
        "Northwind Labs",
        "Karan Shah",
        "talent@northwind.test",
        "Electronics",
    ))?;
    println!("- Registered companies {} and {}", acme.id, northwind.id);

    let drive = services.drives.create(NewDrive {
        company: acme.id.clone(),
        title: "Graduate Software Engineer".to_string(),
        description: Some("Campus hiring for the platform team".to_string()),
        roles: vec!["Software Engineer".to_string()],
        eligibility: EligibilityCriteria {
            min_cgpa: 7.0,
            branches: vec![Branch::Cse, Branch::It],
            max_backlogs: 0,
            min_tenth_percentage: None,
            min_twelfth_percentage: None,
        },
        drive_date: today + Duration::days(7),
        registration_deadline: Some(today + Duration::days(5)),
        venue: Some("Main auditorium".to_string()),
        rounds: Vec::new(),
    })?;
    println!(
        "\nDrive {} \"{}\" on {} ({})",
        drive.id,
        drive.title,
        drive.drive_date,
        drive.status.label()
    );

    let mut registered = Vec::new();
    for student in &students {
        match services.drives.register_student(&drive.id, &student.id) {
            Ok(_) => {
                println!("  + {} ({}) registered", student.name, student.id);
                registered.push(student.id.clone());
            }
            Err(err) => println!("  - {} ({}) rejected: {err}", student.name, student.id),
        }
    }

    if let Some(first) = registered.first() {
        if let Err(err) = services.drives.register_student(&drive.id, first) {
            println!("  - repeat registration rejected: {err}");
        }
    }
    if let Some(student) = pending {
        println!(
            "  {} remains {}",
            student.name,
            StudentStatus::Pending.label()
        );
    }

    let shortlisted: Vec<_> = registered.iter().take(3).cloned().collect();
    let selected: Vec<_> = shortlisted.iter().take(2).cloned().collect();
    let results = DriveResults {
        shortlisted_students: shortlisted,
        selected_students: selected,
        package: Some(12.0),
    };
    let completed = services.drives.submit_results(&drive.id, results.clone())?;
    render_drive(&completed);

    let repeated = services.drives.submit_results(&drive.id, results)?;
    let placed = services
        .directory
        .list_students(&StudentFilter::placed())?
        .len();
    println!(
        "  Resubmitted identical results: {} selected, {} students placed overall",
        repeated.selected_students.len(),
        placed
    );

    if list_students {
        println!("\nStudents");
        for student in services.directory.list_students(&Default::default())? {
            render_student(&student);
        }
    }

    let report = services.reports.generate(
        ReportRequest {
            academic_year,
            semester: None,
        },
        &admin,
    )?;
    render_report(&report);

    Ok(())
}

fn demo_company(name: &str, hr_name: &str, hr_email: &str, industry: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        hr_name: hr_name.to_string(),
        hr_email: hr_email.to_string(),
        hr_phone: None,
        industry: Some(industry.to_string()),
        website: None,
        address: None,
        roles: Vec::new(),
    }
}

fn render_drive(drive: &Drive) {
    println!(
        "\nDrive {} is {} | {} registered | {} shortlisted | {} selected",
        drive.id,
        drive.status.label(),
        drive.registered_students.len(),
        drive.shortlisted_students.len(),
        drive.selected_students.len()
    );
}

fn render_student(student: &Student) {
    let placement = match (student.placed_company(), student.placed_package()) {
        (Some(company), Some(package)) => format!("placed at {company} ({package:.2} LPA)"),
        (Some(company), None) => format!("placed at {company}"),
        _ => "not placed".to_string(),
    };
    println!(
        "  - {} {} [{} | CGPA {:.2} | {}] {}",
        student.id,
        student.name,
        student.branch.code(),
        student.cgpa,
        student.status.label(),
        placement
    );
}

fn render_report(report: &PlacementReport) {
    println!("\nPlacement report {} ({})", report.id, report.academic_year);
    println!(
        "- {} of {} students placed | {} active companies | {} completed drives",
        report.students_placed,
        report.total_students,
        report.companies_participated,
        report.drives_organized
    );
    println!(
        "- Packages: highest {:.2} | average {:.2} | lowest {:.2}",
        report.highest_package, report.average_package, report.lowest_package
    );
    println!("By branch:");
    for row in &report.placements_by_branch {
        println!(
            "  - {}: {}/{} ({:.2}%)",
            row.branch.code(),
            row.placed_students,
            row.total_students,
            row.percentage
        );
    }
    println!("By company:");
    for row in &report.placements_by_company {
        println!("  - {}: {}", row.company, row.students_placed);
    }
    println!("Salary distribution:");
    for bucket in &report.salary_distribution {
        println!("  - {}: {}", bucket.range, bucket.count);
    }
    println!("Job categories:");
    for share in &report.job_categories {
        println!(
            "  - {}: {} ({:.2}%)",
            share.category, share.count, share.percentage
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roster_parses_and_validates() {
        let drafts = read_roster(SAMPLE_ROSTER.as_bytes()).expect("sample roster parses");
        assert_eq!(drafts.len(), 7);
        assert!(drafts.iter().all(|draft| draft.validate().is_ok()));
        assert_eq!(drafts[0].skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            academic_year: "2025-26".to_string(),
            today: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..DemoArgs::default()
        };
        run_demo(args).expect("demo completes");
    }
}
