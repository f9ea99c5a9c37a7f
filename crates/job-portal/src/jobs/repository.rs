use async_trait::async_trait;

use super::domain::{Job, JobId};
use crate::accounts::UserId;
use crate::store::StoreError;

/// Selection applied when listing jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    Active,
    OwnedBy(UserId),
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::Active => job.is_active,
            JobFilter::OwnedBy(owner) => job.user.as_ref() == Some(owner),
        }
    }
}

/// Storage abstraction for the job catalog.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts the job unless another job already carries the same title.
    async fn insert(&self, job: Job) -> Result<Job, StoreError>;
    async fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    async fn find_by_title(&self, title: &str) -> Result<Option<Job>, StoreError>;
    /// Matching jobs in insertion order.
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;
}
