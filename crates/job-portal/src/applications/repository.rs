use async_trait::async_trait;

use super::domain::{Application, ApplicationId};
use crate::jobs::JobId;
use crate::store::StoreError;

/// Storage abstraction for job applications.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts the application unless one already exists for the same job and email.
    /// The check and the insert happen atomically.
    async fn insert(&self, application: Application) -> Result<Application, StoreError>;
    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    /// `email` must already be normalized.
    async fn find_for_applicant(
        &self,
        job_id: &JobId,
        email: &str,
    ) -> Result<Option<Application>, StoreError>;
    async fn list_for_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError>;
}
