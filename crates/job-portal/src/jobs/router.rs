use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::JobDraft;
use super::repository::JobRepository;
use super::service::JobCatalog;
use crate::accounts::UserId;
use crate::error::ApiError;

/// Router exposing job posting and the three listing views.
pub fn job_router<R>(catalog: Arc<JobCatalog<R>>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route("/jobs", post(create_handler::<R>))
        .route("/jobslist", get(active_handler::<R>))
        .route(
            "/jobslist/:user_id",
            post(create_owned_handler::<R>).get(owned_handler::<R>),
        )
        .route("/alljobs", get(all_handler::<R>))
        .with_state(catalog)
}

pub(crate) async fn create_handler<R>(
    State(catalog): State<Arc<JobCatalog<R>>>,
    payload: Result<Json<JobDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    R: JobRepository + 'static,
{
    let Json(draft) = payload?;
    let job = catalog.create(None, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job created successfully", "job": job })),
    ))
}

pub(crate) async fn create_owned_handler<R>(
    State(catalog): State<Arc<JobCatalog<R>>>,
    Path(user_id): Path<String>,
    payload: Result<Json<JobDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    R: JobRepository + 'static,
{
    let Json(draft) = payload?;
    let job = catalog.create(Some(UserId(user_id)), draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job created successfully", "job": job })),
    ))
}

pub(crate) async fn active_handler<R>(
    State(catalog): State<Arc<JobCatalog<R>>>,
) -> Result<Json<Value>, ApiError>
where
    R: JobRepository + 'static,
{
    let jobs = catalog.list_active().await?;
    Ok(Json(json!({
        "message": "Jobs retrieved successfully",
        "count": jobs.len(),
        "jobs": jobs,
    })))
}

pub(crate) async fn owned_handler<R>(
    State(catalog): State<Arc<JobCatalog<R>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    R: JobRepository + 'static,
{
    let jobs = catalog.list_by_owner(&UserId(user_id)).await?;
    Ok(Json(json!({
        "message": "Jobs retrieved successfully",
        "count": jobs.len(),
        "jobs": jobs,
    })))
}

pub(crate) async fn all_handler<R>(
    State(catalog): State<Arc<JobCatalog<R>>>,
) -> Result<Json<Value>, ApiError>
where
    R: JobRepository + 'static,
{
    let jobs = catalog.list_all().await?;
    Ok(Json(json!({ "message": "All jobs", "jobsdata": jobs })))
}
