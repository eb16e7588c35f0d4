use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display identifier for students, e.g. `STU0007`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

/// Display identifier for recruiting companies, e.g. `COMP0003`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed department codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Branch {
    Cse,
    Ece,
    Mech,
    Civil,
    Eee,
    It,
    Chem,
    Bio,
}

impl Branch {
    pub const fn all() -> [Self; 8] {
        [
            Self::Cse,
            Self::Ece,
            Self::Mech,
            Self::Civil,
            Self::Eee,
            Self::It,
            Self::Chem,
            Self::Bio,
        ]
    }

    /// Branches broken out in placement reports and analytics.
    pub const fn reported() -> [Self; 5] {
        [Self::Cse, Self::Ece, Self::Mech, Self::Civil, Self::Eee]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Ece => "ECE",
            Self::Mech => "MECH",
            Self::Civil => "CIVIL",
            Self::Eee => "EEE",
            Self::It => "IT",
            Self::Chem => "CHEM",
            Self::Bio => "BIO",
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::all()
            .into_iter()
            .find(|branch| branch.code().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StudentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Disabled,
}

impl StudentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Disabled => "Disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
}

/// Outcome of a completed drive recorded on the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Annual package in lakhs per annum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<f64>,
}

/// Placement being granted by drive results; a missing package keeps the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementGrant {
    pub company: String,
    pub role: Option<String>,
    pub package: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub branch: Branch,
    pub cgpa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u8>,
    #[serde(default)]
    pub backlogs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_link: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_percentage: Option<f64>,
    pub status: StudentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    pub fn placed_company(&self) -> Option<&str> {
        self.placement.as_ref().map(|placement| placement.company.as_str())
    }

    pub fn placed_package(&self) -> Option<f64> {
        self.placement.as_ref().and_then(|placement| placement.package)
    }

    pub fn grant_placement(&mut self, grant: &PlacementGrant) {
        let package = grant
            .package
            .or_else(|| self.placement.as_ref().and_then(|current| current.package));
        self.placement = Some(Placement {
            company: grant.company.clone(),
            role: grant.role.clone(),
            package,
        });
    }
}

/// Admin-supplied fields for a new student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub branch: Branch,
    pub cgpa: f64,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub backlogs: u32,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_link: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub tenth_percentage: Option<f64>,
    #[serde(default)]
    pub twelfth_percentage: Option<f64>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("student name is required".to_string());
        }
        validate_email(&self.email)?;
        validate_cgpa(self.cgpa)?;
        if let Some(semester) = self.semester {
            validate_semester(semester)?;
        }
        validate_percentage("tenth_percentage", self.tenth_percentage)?;
        validate_percentage("twelfth_percentage", self.twelfth_percentage)?;
        Ok(())
    }

    pub fn into_student(self, id: StudentId, created_at: DateTime<Utc>) -> Student {
        Student {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            branch: self.branch,
            cgpa: self.cgpa,
            semester: self.semester,
            backlogs: self.backlogs,
            phone: self.phone,
            resume_link: self.resume_link,
            skills: self.skills,
            certifications: self.certifications,
            tenth_percentage: self.tenth_percentage,
            twelfth_percentage: self.twelfth_percentage,
            status: self.status.unwrap_or_default(),
            placement: None,
            created_at,
        }
    }
}

/// Partial update of a student profile. Placement is only changed by drive results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub backlogs: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_link: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default)]
    pub tenth_percentage: Option<f64>,
    #[serde(default)]
    pub twelfth_percentage: Option<f64>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl StudentPatch {
    pub fn status(status: StudentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("student name cannot be blank".to_string());
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(cgpa) = self.cgpa {
            validate_cgpa(cgpa)?;
        }
        if let Some(semester) = self.semester {
            validate_semester(semester)?;
        }
        validate_percentage("tenth_percentage", self.tenth_percentage)?;
        validate_percentage("twelfth_percentage", self.twelfth_percentage)?;
        Ok(())
    }

    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            student.email = email.trim().to_ascii_lowercase();
        }
        if let Some(branch) = self.branch {
            student.branch = branch;
        }
        if let Some(cgpa) = self.cgpa {
            student.cgpa = cgpa;
        }
        if let Some(semester) = self.semester {
            student.semester = Some(semester);
        }
        if let Some(backlogs) = self.backlogs {
            student.backlogs = backlogs;
        }
        if let Some(phone) = &self.phone {
            student.phone = Some(phone.clone());
        }
        if let Some(link) = &self.resume_link {
            student.resume_link = Some(link.clone());
        }
        if let Some(skills) = &self.skills {
            student.skills = skills.clone();
        }
        if let Some(certifications) = &self.certifications {
            student.certifications = certifications.clone();
        }
        if let Some(tenth) = self.tenth_percentage {
            student.tenth_percentage = Some(tenth);
        }
        if let Some(twelfth) = self.twelfth_percentage {
            student.twelfth_percentage = Some(twelfth);
        }
        if let Some(status) = self.status {
            student.status = status;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub status: Option<StudentStatus>,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub is_placed: Option<bool>,
}

impl StudentFilter {
    pub fn placed() -> Self {
        Self {
            is_placed: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.status.map_or(true, |status| student.status == status)
            && self.branch.map_or(true, |branch| student.branch == branch)
            && self
                .is_placed
                .map_or(true, |placed| student.is_placed() == placed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub hr_name: String,
    pub hr_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub hr_name: String,
    pub hr_email: String,
    #[serde(default)]
    pub hr_phone: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("company name is required".to_string());
        }
        if self.hr_name.trim().is_empty() {
            return Err("hr contact name is required".to_string());
        }
        validate_email(&self.hr_email)
    }

    pub fn into_company(self, id: CompanyId, created_at: DateTime<Utc>) -> Company {
        Company {
            id,
            name: self.name.trim().to_string(),
            hr_name: self.hr_name.trim().to_string(),
            hr_email: self.hr_email.trim().to_ascii_lowercase(),
            hr_phone: self.hr_phone,
            industry: self.industry,
            website: self.website,
            address: self.address,
            roles: self.roles,
            status: CompanyStatus::Active,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hr_name: Option<String>,
    #[serde(default)]
    pub hr_email: Option<String>,
    #[serde(default)]
    pub hr_phone: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<CompanyStatus>,
}

impl CompanyPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("company name cannot be blank".to_string());
            }
        }
        if let Some(email) = &self.hr_email {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn apply(&self, company: &mut Company) {
        if let Some(name) = &self.name {
            company.name = name.trim().to_string();
        }
        if let Some(hr_name) = &self.hr_name {
            company.hr_name = hr_name.trim().to_string();
        }
        if let Some(hr_email) = &self.hr_email {
            company.hr_email = hr_email.trim().to_ascii_lowercase();
        }
        if let Some(phone) = &self.hr_phone {
            company.hr_phone = Some(phone.clone());
        }
        if let Some(industry) = &self.industry {
            company.industry = Some(industry.clone());
        }
        if let Some(website) = &self.website {
            company.website = Some(website.clone());
        }
        if let Some(address) = &self.address {
            company.address = Some(address.clone());
        }
        if let Some(roles) = &self.roles {
            company.roles = roles.clone();
        }
        if let Some(status) = self.status {
            company.status = status;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyFilter {
    #[serde(default)]
    pub status: Option<CompanyStatus>,
}

impl CompanyFilter {
    pub fn active() -> Self {
        Self {
            status: Some(CompanyStatus::Active),
        }
    }

    pub fn matches(&self, company: &Company) -> bool {
        self.status.map_or(true, |status| company.status == status)
    }
}

fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("'{email}' is not a valid e-mail address")),
    }
}

fn validate_cgpa(cgpa: f64) -> Result<(), String> {
    if cgpa.is_finite() && (0.0..=10.0).contains(&cgpa) {
        Ok(())
    } else {
        Err(format!("cgpa must be between 0 and 10, found {cgpa}"))
    }
}

fn validate_semester(semester: u8) -> Result<(), String> {
    if (1..=8).contains(&semester) {
        Ok(())
    } else {
        Err(format!("semester must be between 1 and 8, found {semester}"))
    }
}

fn validate_percentage(field: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(value) if !(value.is_finite() && (0.0..=100.0).contains(&value)) => Err(format!(
            "{field} must be between 0 and 100, found {value}"
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_entry() -> NewStudent {
        NewStudent {
            name: "Asha Rao".to_string(),
            email: "Asha.Rao@college.edu".to_string(),
            branch: Branch::Cse,
            cgpa: 8.1,
            semester: Some(7),
            backlogs: 0,
            phone: None,
            resume_link: None,
            skills: vec!["rust".to_string()],
            certifications: Vec::new(),
            tenth_percentage: Some(91.0),
            twelfth_percentage: None,
            status: None,
        }
    }

    #[test]
    fn branch_codes_round_trip_case_insensitively() {
        for branch in Branch::all() {
            assert_eq!(Branch::from_code(&branch.code().to_lowercase()), Some(branch));
        }
        assert_eq!(Branch::from_code("AERO"), None);
    }

    #[test]
    fn new_students_default_to_pending_and_normalize_email() {
        let created = Utc::now();
        let student = roster_entry().into_student(StudentId("STU0001".to_string()), created);
        assert_eq!(student.status, StudentStatus::Pending);
        assert_eq!(student.email, "asha.rao@college.edu");
        assert!(!student.is_placed());
    }

    #[test]
    fn validation_rejects_out_of_range_cgpa_and_semester() {
        let mut entry = roster_entry();
        entry.cgpa = 10.5;
        assert!(entry.validate().unwrap_err().contains("cgpa"));

        let mut entry = roster_entry();
        entry.semester = Some(9);
        assert!(entry.validate().unwrap_err().contains("semester"));

        let mut entry = roster_entry();
        entry.email = "not-an-email".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn grant_without_package_keeps_previous_package() {
        let mut student =
            roster_entry().into_student(StudentId("STU0002".to_string()), Utc::now());
        student.grant_placement(&PlacementGrant {
            company: "Initech".to_string(),
            role: Some("SDE".to_string()),
            package: Some(6.5),
        });
        student.grant_placement(&PlacementGrant {
            company: "Globex".to_string(),
            role: None,
            package: None,
        });

        let placement = student.placement.expect("placed");
        assert_eq!(placement.company, "Globex");
        assert_eq!(placement.package, Some(6.5));
    }

    #[test]
    fn filter_combines_all_present_clauses() {
        let mut student =
            roster_entry().into_student(StudentId("STU0003".to_string()), Utc::now());
        student.status = StudentStatus::Approved;

        let filter = StudentFilter {
            status: Some(StudentStatus::Approved),
            branch: Some(Branch::Cse),
            is_placed: Some(false),
        };
        assert!(filter.matches(&student));
        assert!(!StudentFilter::placed().matches(&student));
    }
}
