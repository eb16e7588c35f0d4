use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::{Branch, CompanyId, StudentId};

/// Display identifier for recruitment drives, e.g. `DRV0012`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriveId(pub String);

impl std::fmt::Display for DriveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriveStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl DriveStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Scheduled,
            Self::Ongoing,
            Self::Completed,
            Self::Cancelled,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Edges of the drive state machine. Staying put is always allowed.
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Scheduled, Self::Scheduled)
            | (Self::Ongoing, Self::Ongoing)
            | (Self::Completed, Self::Completed)
            | (Self::Cancelled, Self::Cancelled) => true,
            (Self::Scheduled, Self::Ongoing | Self::Completed | Self::Cancelled) => true,
            (Self::Ongoing, Self::Completed | Self::Cancelled) => true,
            _ => false,
        }
    }
}

/// Gate applied before a student may register for a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    #[serde(default)]
    pub min_cgpa: f64,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub max_backlogs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tenth_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_twelfth_percentage: Option<f64>,
}

impl EligibilityCriteria {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_cgpa.is_finite() && (0.0..=10.0).contains(&self.min_cgpa)) {
            return Err(format!(
                "minimum cgpa must be between 0 and 10, found {}",
                self.min_cgpa
            ));
        }
        if self.branches.is_empty() {
            return Err("at least one eligible branch is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundType {
    #[serde(rename = "Online Test")]
    OnlineTest,
    Technical,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Group Discussion")]
    GroupDiscussion,
    #[serde(rename = "Case Study")]
    CaseStudy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveRound {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_type: Option<RoundType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub id: DriveId,
    pub company: CompanyId,
    pub company_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub eligibility: EligibilityCriteria,
    pub drive_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub rounds: Vec<DriveRound>,
    #[serde(default)]
    pub registered_students: Vec<StudentId>,
    #[serde(default)]
    pub shortlisted_students: Vec<StudentId>,
    #[serde(default)]
    pub selected_students: Vec<StudentId>,
    pub status: DriveStatus,
    /// Bumped by the store on every write; stale writers get a conflict.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drive {
    pub fn is_registered(&self, student: &StudentId) -> bool {
        self.registered_students.contains(student)
    }

    /// True when the student appears in any of the three reference lists.
    pub fn references(&self, student: &StudentId) -> bool {
        self.registered_students.contains(student)
            || self.shortlisted_students.contains(student)
            || self.selected_students.contains(student)
    }
}

/// Administrator input for scheduling a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrive {
    pub company: CompanyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub eligibility: EligibilityCriteria,
    pub drive_date: NaiveDate,
    #[serde(default)]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub rounds: Vec<DriveRound>,
}

impl NewDrive {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("drive title is required".to_string());
        }
        self.eligibility.validate()?;
        if let Some(deadline) = self.registration_deadline {
            if deadline > self.drive_date {
                return Err(format!(
                    "registration deadline {deadline} falls after drive date {}",
                    self.drive_date
                ));
            }
        }
        Ok(())
    }
}

/// Direct administrator edits. Completion is reserved for result ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub eligibility: Option<EligibilityCriteria>,
    #[serde(default)]
    pub drive_date: Option<NaiveDate>,
    #[serde(default)]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub rounds: Option<Vec<DriveRound>>,
    #[serde(default)]
    pub status: Option<DriveStatus>,
}

impl DriveUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("drive title cannot be blank".to_string());
            }
        }
        if let Some(criteria) = &self.eligibility {
            criteria.validate()?;
        }
        Ok(())
    }

    pub fn apply(&self, drive: &mut Drive) {
        if let Some(title) = &self.title {
            drive.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            drive.description = Some(description.clone());
        }
        if let Some(roles) = &self.roles {
            drive.roles = roles.clone();
        }
        if let Some(criteria) = &self.eligibility {
            drive.eligibility = criteria.clone();
        }
        if let Some(date) = self.drive_date {
            drive.drive_date = date;
        }
        if let Some(deadline) = self.registration_deadline {
            drive.registration_deadline = Some(deadline);
        }
        if let Some(venue) = &self.venue {
            drive.venue = Some(venue.clone());
        }
        if let Some(rounds) = &self.rounds {
            drive.rounds = rounds.clone();
        }
        if let Some(status) = self.status {
            drive.status = status;
        }
    }
}

/// Shortlist and selection lists uploaded once a drive finishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveResults {
    #[serde(default)]
    pub shortlisted_students: Vec<StudentId>,
    #[serde(default)]
    pub selected_students: Vec<StudentId>,
    /// Package offered to the selected students, when known.
    #[serde(default)]
    pub package: Option<f64>,
}

/// Student registration request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub student_id: StudentId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DriveFilter {
    #[serde(default)]
    pub status: Option<DriveStatus>,
    #[serde(default)]
    pub company: Option<CompanyId>,
    #[serde(default)]
    pub student: Option<StudentId>,
}

impl DriveFilter {
    pub fn with_status(status: DriveStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn for_company(company: CompanyId) -> Self {
        Self {
            company: Some(company),
            ..Self::default()
        }
    }

    pub fn referencing(student: StudentId) -> Self {
        Self {
            student: Some(student),
            ..Self::default()
        }
    }

    pub fn matches(&self, drive: &Drive) -> bool {
        self.status.map_or(true, |status| drive.status == status)
            && self
                .company
                .as_ref()
                .map_or(true, |company| &drive.company == company)
            && self
                .student
                .as_ref()
                .map_or(true, |student| drive.references(student))
    }
}

/// Collapse repeated ids, keeping the first occurrence.
pub(crate) fn dedupe(ids: &[StudentId]) -> Vec<StudentId> {
    let mut unique: Vec<StudentId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }
    unique
}
