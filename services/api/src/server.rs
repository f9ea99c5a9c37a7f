use crate::cli::ServeArgs;
use crate::infra::{AppState, Services};
use crate::routes::app_router;
use axum::http::HeaderValue;
use axum_prometheus::PrometheusMetricLayer;
use job_portal::config::{AppConfig, ConfigError};
use job_portal::error::AppError;
use job_portal::store::Database;
use job_portal::telemetry;
use job_portal::uploads::{ContentStore, UploadPolicy};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(directory) = args.upload_dir.take() {
        config.uploads.directory = directory;
    }

    telemetry::init(&config.telemetry)?;

    let database = match Database::connect(&config.database.location).await {
        Ok(database) => Arc::new(database),
        Err(err) => {
            error!(error = %err, "failed to open document store");
            return Err(err.into());
        }
    };
    let content = Arc::new(ContentStore::open(&config.uploads.directory).await?);
    let policy = UploadPolicy::default();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        content: content.clone(),
        policy: policy.clone(),
    };

    let services = Services::new(database, content, policy, &config.auth);
    let origin = HeaderValue::from_str(&config.server.frontend_origin).map_err(|_| {
        ConfigError::InvalidOrigin {
            value: config.server.frontend_origin.clone(),
        }
    })?;
    let app = app_router(&services, app_state, origin).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, uploads = %config.uploads.directory.display(), "job portal api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("job portal api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}
