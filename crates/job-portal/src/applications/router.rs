use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::Submission;
use super::repository::ApplicationRepository;
use super::service::ApplicationService;
use crate::error::{ApiError, ErrorKind};
use crate::jobs::JobRepository;
use crate::uploads::read_form;

/// Router exposing resume submission and the application queries.
pub fn application_router<A, J>(service: Arc<ApplicationService<A, J>>) -> Router
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    let body_limit = service.policy().request_body_limit();
    Router::new()
        .route(
            "/applyjobs/:job_id",
            post(submit_handler::<A, J>).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/applications/:job_id", get(list_handler::<A, J>))
        .route("/application/:application_id", get(detail_handler::<A, J>))
        .with_state(service)
}

pub(crate) async fn submit_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    Path(job_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    let mut multipart = multipart
        .map_err(|rejection| ApiError::new(ErrorKind::Upload, rejection.body_text()))?;
    let form = read_form(&mut multipart, service.policy()).await?;
    let receipt = service
        .submit(Submission::from_intake(job_id, form))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job application submitted successfully",
            "application": receipt,
        })),
    ))
}

pub(crate) async fn list_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    let applications = service.list_for_job(&job_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": applications.len(),
        "applications": applications,
    })))
}

pub(crate) async fn detail_handler<A, J>(
    State(service): State<Arc<ApplicationService<A, J>>>,
    Path(application_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
{
    let application = service.get(&application_id).await?;
    Ok(Json(json!({
        "success": true,
        "application": application,
    })))
}
