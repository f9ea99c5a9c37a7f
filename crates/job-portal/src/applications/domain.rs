use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::{JobId, JobSummary};
use crate::uploads::content::public_url;
use crate::uploads::{IncomingFile, IntakeForm};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored application document. `resume` is the path of the stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub fullname: String,
    pub email: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub resume: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn resume_url(&self) -> String {
        public_url(&self.resume)
    }

    pub fn detail(&self, job: Option<JobSummary>) -> ApplicationDetail {
        ApplicationDetail {
            id: self.id.clone(),
            job_id: self.job_id.clone(),
            job,
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            cover_letter: self.cover_letter.clone(),
            resume: self.resume.clone(),
            resume_url: self.resume_url(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn receipt(&self, job: Option<JobSummary>) -> SubmissionReceipt {
        SubmissionReceipt {
            id: self.id.clone(),
            job_id: self.job_id.clone(),
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            resume_url: self.resume_url(),
            applied_at: self.created_at,
            job,
        }
    }
}

/// Applicant text fields as they arrived in the form, untrimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantFields {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicantFields {
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let take = |name: &str| fields.get(name).cloned();
        Self {
            fullname: take("fullname"),
            email: take("email"),
            mobile: take("mobile"),
            cover_letter: take("coverLetter"),
        }
    }
}

/// Everything the submission workflow needs from one request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job_id: String,
    pub fields: ApplicantFields,
    pub resume: Option<IncomingFile>,
}

impl Submission {
    pub fn from_intake(job_id: impl Into<String>, form: IntakeForm) -> Self {
        Self {
            job_id: job_id.into(),
            fields: ApplicantFields::from_form(&form.fields),
            resume: form.file,
        }
    }
}

/// Application joined with job fields, as returned by the query routes.
/// `job` is `null` when the referenced job no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job: Option<JobSummary>,
    pub fullname: String,
    pub email: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub resume: String,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response body for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub fullname: String,
    pub email: String,
    pub resume_url: String,
    pub applied_at: DateTime<Utc>,
    pub job: Option<JobSummary>,
}
