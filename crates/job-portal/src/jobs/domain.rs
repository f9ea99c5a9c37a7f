use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::UserId;

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Fresher,
    Junior,
    Mid,
    Senior,
}

/// Advertised pay band. `min <= max` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

/// Stored job document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub experience: ExperienceLevel,
    pub salary: SalaryRange,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job posting payload shared by both creation routes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub experience: ExperienceLevel,
    pub salary: SalaryRange,
    pub skills: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Minimal job fields joined onto application views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobSummary {
    /// Title only, as echoed in a submission receipt.
    pub fn brief(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            location: None,
            description: None,
        }
    }

    /// Title and location, as shown when listing a job's applications.
    pub fn listing(job: &Job) -> Self {
        Self {
            location: Some(job.location.clone()),
            ..Self::brief(job)
        }
    }

    pub fn detailed(job: &Job) -> Self {
        Self {
            description: Some(job.description.clone()),
            ..Self::listing(job)
        }
    }
}
