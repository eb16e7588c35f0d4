use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::CompanyId;
use crate::workflows::drives::EligibilityCriteria;

/// Display identifier for job postings, e.g. `JOB0004`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    Internship,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
}

impl JobType {
    pub const fn all() -> [Self; 4] {
        [Self::FullTime, Self::Internship, Self::PartTime, Self::Contract]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::Internship => "Internship",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Offered compensation band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PackageRange {
    fn validate(&self) -> Result<(), String> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(format!("package bounds must be non-negative, found {bound}"));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("package minimum {min} exceeds maximum {max}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company: CompanyId,
    pub company_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageRange>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub company: CompanyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub package: Option<PackageRange>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub eligibility: Option<EligibilityCriteria>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
}

impl NewJobPosting {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("job title is required".to_string());
        }
        if let Some(package) = &self.package {
            package.validate()?;
        }
        if let Some(criteria) = &self.eligibility {
            criteria.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub package: Option<PackageRange>,
    #[serde(default)]
    pub skills_required: Option<Vec<String>>,
    #[serde(default)]
    pub eligibility: Option<EligibilityCriteria>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl JobPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("job title cannot be blank".to_string());
            }
        }
        if let Some(package) = &self.package {
            package.validate()?;
        }
        if let Some(criteria) = &self.eligibility {
            criteria.validate()?;
        }
        Ok(())
    }

    pub fn apply(&self, job: &mut JobPosting) {
        if let Some(title) = &self.title {
            job.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            job.description = Some(description.clone());
        }
        if let Some(role) = &self.role {
            job.role = Some(role.clone());
        }
        if let Some(job_type) = self.job_type {
            job.job_type = Some(job_type);
        }
        if let Some(location) = &self.location {
            job.location = Some(location.clone());
        }
        if let Some(package) = &self.package {
            job.package = Some(package.clone());
        }
        if let Some(skills) = &self.skills_required {
            job.skills_required = skills.clone();
        }
        if let Some(criteria) = &self.eligibility {
            job.eligibility = Some(criteria.clone());
        }
        if let Some(deadline) = self.application_deadline {
            job.application_deadline = Some(deadline);
        }
        if let Some(active) = self.is_active {
            job.is_active = active;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub company: Option<CompanyId>,
}

impl JobFilter {
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn for_company(company: CompanyId) -> Self {
        Self {
            company: Some(company),
            ..Self::default()
        }
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        self.is_active.map_or(true, |active| job.is_active == active)
            && self
                .job_type
                .map_or(true, |job_type| job.job_type == Some(job_type))
            && self
                .company
                .as_ref()
                .map_or(true, |company| &job.company == company)
    }
}
