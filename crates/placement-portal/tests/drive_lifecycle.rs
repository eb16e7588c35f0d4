use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use placement_portal::config::PortalConfig;
use placement_portal::store::InMemoryPortalStore;
use placement_portal::workflows::directory::{
    Branch, DirectoryService, NewCompany, NewStudent, Student, StudentStatus,
};
use placement_portal::workflows::drives::{
    Drive, DriveError, DriveResults, DriveService, DriveStatus, EligibilityCriteria, NewDrive,
};

struct Portal {
    directory: DirectoryService<InMemoryPortalStore>,
    drives: Arc<DriveService<InMemoryPortalStore>>,
}

impl Portal {
    fn new() -> Self {
        let store = Arc::new(InMemoryPortalStore::new());
        Self {
            directory: DirectoryService::new(store.clone()),
            drives: Arc::new(DriveService::new(store, &PortalConfig::default())),
        }
    }

    fn student(&self, name: &str, cgpa: f64, status: StudentStatus) -> Student {
        self.directory
            .create_student(NewStudent {
                name: name.to_string(),
                email: format!("{}@college.test", name.to_ascii_lowercase()),
                branch: Branch::Cse,
                cgpa,
                semester: Some(8),
                backlogs: 0,
                phone: None,
                resume_link: None,
                skills: Vec::new(),
                certifications: Vec::new(),
                tenth_percentage: None,
                twelfth_percentage: None,
                status: Some(status),
            })
            .expect("student created")
    }

    fn drive(&self) -> Drive {
        let company = self
            .directory
            .create_company(NewCompany {
                name: "Acme Systems".to_string(),
                hr_name: "Meena Iyer".to_string(),
                hr_email: "campus@acme.test".to_string(),
                hr_phone: None,
                industry: Some("Software".to_string()),
                website: None,
                address: None,
                roles: vec!["Software Engineer".to_string()],
            })
            .expect("company created");

        self.drives
            .create(NewDrive {
                company: company.id,
                title: "Acme graduate hiring".to_string(),
                description: None,
                roles: vec!["Software Engineer".to_string()],
                eligibility: EligibilityCriteria {
                    min_cgpa: 6.0,
                    branches: vec![Branch::Cse],
                    max_backlogs: 0,
                    min_tenth_percentage: None,
                    min_twelfth_percentage: None,
                },
                drive_date: NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date"),
                registration_deadline: None,
                venue: None,
                rounds: Vec::new(),
            })
            .expect("drive created")
    }
}

#[test]
fn registration_and_results_place_the_eligible_student() {
    let portal = Portal::new();
    let drive = portal.drive();
    let a = portal.student("Asha", 6.5, StudentStatus::Approved);
    let b = portal.student("Bala", 5.9, StudentStatus::Approved);

    let registered = portal
        .drives
        .register_student(&drive.id, &a.id)
        .expect("student A registers");
    assert_eq!(registered.registered_students, vec![a.id.clone()]);

    assert!(matches!(
        portal.drives.register_student(&drive.id, &b.id),
        Err(DriveError::IneligibleCriteria { .. })
    ));

    let completed = portal
        .drives
        .submit_results(
            &drive.id,
            DriveResults {
                shortlisted_students: vec![a.id.clone()],
                selected_students: vec![a.id.clone()],
                package: None,
            },
        )
        .expect("results recorded");
    assert_eq!(completed.status, DriveStatus::Completed);

    let placed = portal.directory.get_student(&a.id).expect("student A");
    assert!(placed.is_placed());
    assert_eq!(placed.placed_company(), Some(drive.company_name.as_str()));
    assert!(!portal.directory.get_student(&b.id).expect("student B").is_placed());
}

#[test]
fn pending_students_cannot_register() {
    let portal = Portal::new();
    let drive = portal.drive();
    let pending = portal.student("Charu", 9.9, StudentStatus::Pending);

    assert!(matches!(
        portal.drives.register_student(&drive.id, &pending.id),
        Err(DriveError::IneligibleStatus { .. })
    ));
}

#[test]
fn concurrent_registrations_keep_a_single_entry() {
    let portal = Portal::new();
    let drive = portal.drive();
    let student = portal.student("Asha", 7.0, StudentStatus::Approved);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let drives = Arc::clone(&portal.drives);
            let drive_id = drive.id.clone();
            let student_id = student.id.clone();
            thread::spawn(move || drives.register_student(&drive_id, &student_id))
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread finished"))
        .collect();

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(DriveError::AlreadyRegistered { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 7);

    let stored = portal.drives.get(&drive.id).expect("drive");
    assert_eq!(stored.registered_students, vec![student.id]);
}
