use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Job, JobDraft, JobId};
use super::repository::{JobFilter, JobRepository};
use crate::accounts::UserId;
use crate::error::{ApiError, ErrorKind};
use crate::store::StoreError;
use crate::validation::present;

/// Posting and listing over a job repository.
pub struct JobCatalog<R> {
    repository: Arc<R>,
}

impl<R> JobCatalog<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Post a job, optionally owned by a user. Titles are unique across the catalog.
    pub async fn create(
        &self,
        owner: Option<UserId>,
        draft: JobDraft,
    ) -> Result<Job, JobServiceError> {
        let owner = match owner {
            Some(UserId(raw)) => match present(Some(raw.as_str())) {
                Some(id) => Some(UserId(id.to_string())),
                None => return Err(JobServiceError::MissingOwner),
            },
            None => None,
        };

        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;
        let location = required("location", &draft.location)?;
        if !draft.salary.min.is_finite()
            || !draft.salary.max.is_finite()
            || draft.salary.min < 0.0
            || draft.salary.max < 0.0
        {
            return Err(JobServiceError::InvalidSalary);
        }
        let skills: Vec<String> = draft
            .skills
            .iter()
            .filter_map(|skill| present(Some(skill.as_str())))
            .map(str::to_string)
            .collect();
        if skills.is_empty() {
            return Err(JobServiceError::MissingField("skills"));
        }

        if self.repository.find_by_title(&title).await?.is_some() {
            return Err(JobServiceError::DuplicateTitle(title));
        }

        let now = Utc::now();
        let job = Job {
            id: JobId::generate(),
            user: owner,
            title,
            description,
            location,
            job_type: draft.job_type,
            experience: draft.experience,
            salary: draft.salary,
            skills,
            is_active: draft.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let job = self.repository.insert(job).await.map_err(|err| match err {
            StoreError::Duplicate { .. } => JobServiceError::DuplicateTitle(draft.title.trim().to_string()),
            other => JobServiceError::Store(other),
        })?;
        info!(job_id = %job.id, owner = ?job.user, "job posted");
        Ok(job)
    }

    /// Active jobs, newest first.
    pub async fn list_active(&self) -> Result<Vec<Job>, JobServiceError> {
        self.newest_first(JobFilter::Active).await
    }

    /// Jobs posted by `owner`, newest first.
    pub async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobServiceError> {
        self.newest_first(JobFilter::OwnedBy(owner.clone())).await
    }

    /// Every job in posting order.
    pub async fn list_all(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.repository.list(&JobFilter::All).await?)
    }

    async fn newest_first(&self, filter: JobFilter) -> Result<Vec<Job>, JobServiceError> {
        let mut jobs = self.repository.list(&filter).await?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, JobServiceError> {
    present(Some(value))
        .map(str::to_string)
        .ok_or(JobServiceError::MissingField(field))
}

/// Error raised by the job catalog.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("all fields are required for job list: '{0}' is missing")]
    MissingField(&'static str),
    #[error("user id is required in the url")]
    MissingOwner,
    #[error("salary bounds must be non-negative numbers")]
    InvalidSalary,
    #[error("a job titled '{0}' is already registered")]
    DuplicateTitle(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JobServiceError> for ApiError {
    fn from(error: JobServiceError) -> Self {
        let kind = match &error {
            JobServiceError::MissingField(_) | JobServiceError::InvalidSalary => {
                ErrorKind::Validation
            }
            JobServiceError::MissingOwner => ErrorKind::MissingParameter,
            JobServiceError::DuplicateTitle(_) => ErrorKind::Conflict,
            JobServiceError::Store(_) => ErrorKind::Persistence,
        };
        ApiError::new(kind, error.to_string())
    }
}
