use async_trait::async_trait;
use tracing::info;

use super::collection::Collection;
use super::{StoreError, StoreLocation};
use crate::accounts::{User, UserRepository};
use crate::applications::{Application, ApplicationId, ApplicationRepository};
use crate::jobs::{Job, JobFilter, JobId, JobRepository};

/// The three collections the service persists.
pub struct Database {
    users: Collection<User>,
    jobs: Collection<Job>,
    applications: Collection<Application>,
}

impl Database {
    pub fn in_memory() -> Self {
        Self {
            users: Collection::in_memory("users"),
            jobs: Collection::in_memory("jobs"),
            applications: Collection::in_memory("applications"),
        }
    }

    /// Opens the collections at `location`, creating the directory if needed.
    pub async fn connect(location: &StoreLocation) -> Result<Self, StoreError> {
        let directory = match location {
            StoreLocation::Memory => {
                info!("using in-memory document store");
                return Ok(Self::in_memory());
            }
            StoreLocation::Directory(directory) => directory,
        };

        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|source| StoreError::Io {
                path: directory.clone(),
                source,
            })?;
        let database = Self {
            users: Collection::open("users", directory).await?,
            jobs: Collection::open("jobs", directory).await?,
            applications: Collection::open("applications", directory).await?,
        };
        info!(directory = %directory.display(), "document store opened");
        Ok(database)
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let email = user.email.clone();
        self.users
            .insert_unique(user, move |existing| existing.email == email)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(|user| user.email == email).await)
    }
}

#[async_trait]
impl JobRepository for Database {
    async fn insert(&self, job: Job) -> Result<Job, StoreError> {
        let title = job.title.clone();
        self.jobs
            .insert_unique(job, move |existing| existing.title == title)
            .await
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.find_one(|job| &job.id == id).await)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.find_one(|job| job.title == title).await)
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        Ok(self.jobs.filter(|job| filter.matches(job)).await)
    }
}

#[async_trait]
impl ApplicationRepository for Database {
    async fn insert(&self, application: Application) -> Result<Application, StoreError> {
        let job_id = application.job_id.clone();
        let email = application.email.clone();
        self.applications
            .insert_unique(application, move |existing| {
                existing.job_id == job_id && existing.email == email
            })
            .await
    }

    async fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self
            .applications
            .find_one(|application| &application.id == id)
            .await)
    }

    async fn find_for_applicant(
        &self,
        job_id: &JobId,
        email: &str,
    ) -> Result<Option<Application>, StoreError> {
        Ok(self
            .applications
            .find_one(|application| &application.job_id == job_id && application.email == email)
            .await)
    }

    async fn list_for_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .applications
            .filter(|application| &application.job_id == job_id)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::UserId;
    use chrono::Utc;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::generate(),
            firstname: "Jane".to_string(),
            lastname: "Doe".to_string(),
            email: email.to_string(),
            mobile: "9876543210".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn application(job: &str, email: &str) -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId::generate(),
            job_id: JobId(job.to_string()),
            fullname: "Jane Doe".to_string(),
            email: email.to_string(),
            mobile: "9876543210".to_string(),
            cover_letter: Some("hi".to_string()),
            resume: "uploads/resume-1-1.pdf".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn users_are_unique_by_email() {
        let db = Database::in_memory();
        UserRepository::insert(&db, user("jane@x.com"))
            .await
            .expect("first insert");
        let err = UserRepository::insert(&db, user("jane@x.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, StoreError::Duplicate { collection: "users" }));
    }

    #[tokio::test]
    async fn applications_are_unique_per_job_and_email() {
        let db = Database::in_memory();
        ApplicationRepository::insert(&db, application("J1", "jane@x.com"))
            .await
            .expect("insert");
        ApplicationRepository::insert(&db, application("J2", "jane@x.com"))
            .await
            .expect("other job is fine");
        let err = ApplicationRepository::insert(&db, application("J1", "jane@x.com"))
            .await
            .expect_err("duplicate");
        assert!(matches!(
            err,
            StoreError::Duplicate {
                collection: "applications"
            }
        ));
        assert_eq!(
            db.list_for_job(&JobId("J1".to_string()))
                .await
                .expect("lists")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn file_backed_database_reloads_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let location = StoreLocation::Directory(dir.path().join("portal"));
        {
            let db = Database::connect(&location).await.expect("connect");
            UserRepository::insert(&db, user("jane@x.com"))
                .await
                .expect("insert");
        }

        let db = Database::connect(&location).await.expect("reconnect");
        assert!(db
            .find_by_email("jane@x.com")
            .await
            .expect("lookup")
            .is_some());
        assert!(dir.path().join("portal").join("users.json").exists());
    }
}
