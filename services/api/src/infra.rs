use job_portal::accounts::{CredentialStore, PasswordHasher, TokenIssuer};
use job_portal::applications::ApplicationService;
use job_portal::config::AuthConfig;
use job_portal::jobs::JobCatalog;
use job_portal::store::Database;
use job_portal::uploads::{ContentStore, UploadPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) content: Arc<ContentStore>,
    pub(crate) policy: UploadPolicy,
}

/// Domain services sharing one document store.
pub(crate) struct Services {
    pub(crate) accounts: Arc<CredentialStore<Database>>,
    pub(crate) jobs: Arc<JobCatalog<Database>>,
    pub(crate) applications: Arc<ApplicationService<Database, Database>>,
}

impl Services {
    pub(crate) fn new(
        database: Arc<Database>,
        content: Arc<ContentStore>,
        policy: UploadPolicy,
        auth: &AuthConfig,
    ) -> Self {
        let accounts = CredentialStore::new(
            database.clone(),
            PasswordHasher::new(auth.bcrypt_cost),
            TokenIssuer::new(auth.jwt_secret.as_bytes(), auth.token_ttl),
        );
        let jobs = JobCatalog::new(database.clone());
        let applications = ApplicationService::new(database.clone(), database, content, policy);

        Self {
            accounts: Arc::new(accounts),
            jobs: Arc::new(jobs),
            applications: Arc::new(applications),
        }
    }
}
