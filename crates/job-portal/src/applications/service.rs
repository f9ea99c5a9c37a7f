use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Application, ApplicationDetail, ApplicationId, Submission, SubmissionReceipt};
use super::repository::ApplicationRepository;
use crate::error::{ApiError, ErrorKind};
use crate::jobs::{Job, JobId, JobRepository, JobSummary};
use crate::store::StoreError;
use crate::uploads::{ContentStore, UploadError, UploadPolicy};
use crate::validation::{is_valid_email, is_valid_mobile, normalize_email, present};

/// Submission workflow and query interface over the application store.
pub struct ApplicationService<A, J> {
    applications: Arc<A>,
    jobs: Arc<J>,
    content: Arc<ContentStore>,
    policy: UploadPolicy,
}

impl<A, J> ApplicationService<A, J>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    pub fn new(
        applications: Arc<A>,
        jobs: Arc<J>,
        content: Arc<ContentStore>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            applications,
            jobs,
            content,
            policy,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate the applicant, store the resume, and record the application.
    ///
    /// The resume only reaches the content directory once every check has
    /// passed, and is removed again if the insert loses.
    pub async fn submit(
        &self,
        submission: Submission,
    ) -> Result<SubmissionReceipt, ApplicationServiceError> {
        let Some(job_id) = present(Some(submission.job_id.as_str())) else {
            return Err(ApplicationServiceError::MissingJobId);
        };
        let job_id = JobId(job_id.to_string());

        let fields = &submission.fields;
        let (Some(fullname), Some(email), Some(mobile), Some(cover_letter)) = (
            present(fields.fullname.as_deref()),
            present(fields.email.as_deref()),
            present(fields.mobile.as_deref()),
            present(fields.cover_letter.as_deref()),
        ) else {
            return Err(ApplicationServiceError::MissingFields);
        };
        if !is_valid_mobile(mobile) {
            return Err(ApplicationServiceError::InvalidMobile);
        }
        if !is_valid_email(email) {
            return Err(ApplicationServiceError::InvalidEmail);
        }
        let Some(resume) = submission.resume.as_ref() else {
            return Err(ApplicationServiceError::MissingResume);
        };

        let email = normalize_email(email);
        if self
            .applications
            .find_for_applicant(&job_id, &email)
            .await?
            .is_some()
        {
            warn!(job_id = %job_id, "duplicate application rejected");
            return Err(ApplicationServiceError::Duplicate);
        }

        let stored = self.content.persist(resume).await?;
        let now = Utc::now();
        let application = Application {
            id: ApplicationId::generate(),
            job_id: job_id.clone(),
            fullname: fullname.to_string(),
            email,
            mobile: mobile.to_string(),
            cover_letter: Some(cover_letter.to_string()),
            resume: stored.path.to_string_lossy().into_owned(),
            created_at: now,
            updated_at: now,
        };

        let application = match self.applications.insert(application).await {
            Ok(application) => application,
            Err(err) => {
                self.content.discard(&stored).await;
                return Err(match err {
                    StoreError::Duplicate { .. } => {
                        warn!(job_id = %job_id, "concurrent duplicate application rejected");
                        ApplicationServiceError::Duplicate
                    }
                    other => ApplicationServiceError::Store(other),
                });
            }
        };

        let job = self.job(&job_id).await?;
        info!(
            application_id = %application.id,
            job_id = %job_id,
            resume = %stored.filename,
            "application submitted"
        );
        Ok(application.receipt(job.as_ref().map(JobSummary::brief)))
    }

    /// Applications for one job, newest first, joined with job title and location.
    pub async fn list_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<ApplicationDetail>, ApplicationServiceError> {
        let Some(job_id) = present(Some(job_id)) else {
            return Err(ApplicationServiceError::MissingJobId);
        };
        let job_id = JobId(job_id.to_string());

        let mut applications = self.applications.list_for_job(&job_id).await?;
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let summary = self.job(&job_id).await?.as_ref().map(JobSummary::listing);
        Ok(applications
            .iter()
            .map(|application| application.detail(summary.clone()))
            .collect())
    }

    /// One application joined with job title, location, and description.
    pub async fn get(&self, id: &str) -> Result<ApplicationDetail, ApplicationServiceError> {
        let Some(id) = present(Some(id)) else {
            return Err(ApplicationServiceError::MissingApplicationId);
        };
        let id = ApplicationId(id.to_string());

        let application = self
            .applications
            .fetch(&id)
            .await?
            .ok_or_else(|| ApplicationServiceError::NotFound(id.clone()))?;
        let job = self.job(&application.job_id).await?;
        Ok(application.detail(job.as_ref().map(JobSummary::detailed)))
    }

    async fn job(&self, id: &JobId) -> Result<Option<Job>, ApplicationServiceError> {
        Ok(self.jobs.fetch(id).await?)
    }
}

/// Error raised by the application workflow.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job id is required")]
    MissingJobId,
    #[error("application id is required")]
    MissingApplicationId,
    #[error("all fields are required: fullname, email, mobile, coverLetter")]
    MissingFields,
    #[error("mobile number should be exactly 10 digits")]
    InvalidMobile,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("resume file is required")]
    MissingResume,
    #[error("you have already applied for this job")]
    Duplicate,
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ApplicationServiceError> for ApiError {
    fn from(error: ApplicationServiceError) -> Self {
        let kind = match &error {
            ApplicationServiceError::MissingJobId
            | ApplicationServiceError::MissingApplicationId => ErrorKind::MissingParameter,
            ApplicationServiceError::MissingFields => ErrorKind::Validation,
            ApplicationServiceError::InvalidMobile | ApplicationServiceError::InvalidEmail => {
                ErrorKind::Format
            }
            ApplicationServiceError::MissingResume => ErrorKind::MissingFile,
            ApplicationServiceError::Duplicate => ErrorKind::Duplicate,
            ApplicationServiceError::NotFound(_) => ErrorKind::NotFound,
            ApplicationServiceError::Upload(upload) => upload.kind(),
            ApplicationServiceError::Store(_) => ErrorKind::Persistence,
        };
        ApiError::new(kind, error.to_string())
    }
}
