use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;
use tempfile::TempDir;

use crate::applications::domain::{ApplicantFields, Application, ApplicationId, Submission};
use crate::applications::repository::ApplicationRepository;
use crate::applications::ApplicationService;
use crate::jobs::{ExperienceLevel, Job, JobId, JobRepository, JobType, SalaryRange};
use crate::store::{Database, StoreError};
use crate::uploads::testing::pdf_bytes;
use crate::uploads::{ContentStore, IncomingFile, UploadPolicy};

pub(super) struct Fixture<A = Database> {
    pub service: Arc<ApplicationService<A, Database>>,
    pub database: Arc<Database>,
    pub content_dir: TempDir,
}

impl<A> Fixture<A> {
    pub fn stored_files(&self) -> Vec<PathBuf> {
        files_in(self.content_dir.path())
    }
}

pub(super) async fn fixture() -> Fixture {
    let database = Arc::new(Database::in_memory());
    build_fixture(database.clone(), database).await
}

pub(super) async fn fixture_with<A>(applications: A) -> Fixture<A>
where
    A: ApplicationRepository + 'static,
{
    build_fixture(Arc::new(applications), Arc::new(Database::in_memory())).await
}

async fn build_fixture<A>(applications: Arc<A>, database: Arc<Database>) -> Fixture<A>
where
    A: ApplicationRepository + 'static,
{
    let content_dir = tempfile::tempdir().expect("tempdir");
    let content = ContentStore::open(content_dir.path())
        .await
        .expect("content store opens");
    let service = Arc::new(ApplicationService::new(
        applications,
        database.clone(),
        Arc::new(content),
        UploadPolicy::default(),
    ));
    Fixture {
        service,
        database,
        content_dir,
    }
}

pub(super) fn resume() -> IncomingFile {
    IncomingFile {
        field: "resume".to_string(),
        original_name: "jane-doe.pdf".to_string(),
        content_type: "application/pdf".parse().expect("mime"),
        bytes: Bytes::from(pdf_bytes()),
    }
}

pub(super) fn fields(email: &str, mobile: &str) -> ApplicantFields {
    ApplicantFields {
        fullname: Some(" Jane Doe ".to_string()),
        email: Some(email.to_string()),
        mobile: Some(mobile.to_string()),
        cover_letter: Some("hi".to_string()),
    }
}

pub(super) fn submission(job_id: &str, email: &str) -> Submission {
    Submission {
        job_id: job_id.to_string(),
        fields: fields(email, "9876543210"),
        resume: Some(resume()),
    }
}

pub(super) async fn seed_job(database: &Database, title: &str) -> Job {
    let now = Utc::now();
    let job = Job {
        id: JobId::generate(),
        user: None,
        title: title.to_string(),
        description: "Design resilient services".to_string(),
        location: "Hyderabad".to_string(),
        job_type: JobType::FullTime,
        experience: ExperienceLevel::Senior,
        salary: SalaryRange {
            min: 1_500_000.0,
            max: 2_500_000.0,
        },
        skills: vec!["rust".to_string()],
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    JobRepository::insert(database, job).await.expect("job seeded")
}

pub(super) fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("content dir readable")
        .map(|entry| entry.expect("dir entry").path())
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Accepts lookups but fails every insert, as a full disk would.
pub(super) struct UnavailableApplications;

#[async_trait]
impl ApplicationRepository for UnavailableApplications {
    async fn insert(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("applications.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"),
        })
    }

    async fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    async fn find_for_applicant(
        &self,
        _job_id: &JobId,
        _email: &str,
    ) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    async fn list_for_job(&self, _job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        Ok(Vec::new())
    }
}
