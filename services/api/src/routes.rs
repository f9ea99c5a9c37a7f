use crate::infra::{AppState, Services};
use axum::extract::OriginalUri;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use job_portal::accounts::account_router;
use job_portal::applications::application_router;
use job_portal::error::ApiError;
use job_portal::jobs::job_router;
use job_portal::uploads::content::PUBLIC_PREFIX;
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub(crate) fn app_router(services: &Services, state: AppState, frontend_origin: HeaderValue) -> Router {
    let api = Router::new()
        .merge(account_router(services.accounts.clone()))
        .merge(job_router(services.jobs.clone()))
        .merge(application_router(services.applications.clone()))
        .route("/health", get(healthcheck))
        .route("/test-upload", get(upload_limits));

    let uploads = ServeDir::new(state.content.directory());

    Router::new()
        .route("/", get(welcome))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .nest("/api", api)
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback(not_found)
        .layer(Extension(state))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(frontend_origin))
}

fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::internal("something went wrong").into_response()
}

pub(crate) async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to Job Portal API",
        "endpoints": {
            "user": "/api/register, /api/login",
            "jobs": "/api/jobs, /api/jobslist, /api/alljobs",
            "apply": "/api/applyjobs/{jobId}",
            "applications": "/api/applications/{jobId}, /api/application/{applicationId}",
            "uploads": "/uploads/{filename}",
            "health": "/api/health",
        }
    }))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    let uploads = if state.content.is_available().await {
        "Exists"
    } else {
        "Missing"
    };
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Job Portal API",
        "uploadsDirectory": uploads,
    }))
}

pub(crate) async fn upload_limits(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "File upload endpoint is working",
        "uploadPath": PUBLIC_PREFIX,
        "maxFileSize": state.policy.max_file_size_label(),
        "allowedTypes": state.policy.allowed_extensions(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": format!("Route {uri} not found"),
        })),
    )
}
