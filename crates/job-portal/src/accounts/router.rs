use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{LoginRequest, Registration};
use super::repository::UserRepository;
use super::service::CredentialStore;
use crate::error::ApiError;

/// Router exposing registration and login.
pub fn account_router<R>(store: Arc<CredentialStore<R>>) -> Router
where
    R: UserRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<R>))
        .route("/login", post(login_handler::<R>))
        .with_state(store)
}

pub(crate) async fn register_handler<R>(
    State(store): State<Arc<CredentialStore<R>>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError>
where
    R: UserRepository + 'static,
{
    let Json(registration) = payload?;
    let user = store.register(registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user.view(),
        })),
    ))
}

pub(crate) async fn login_handler<R>(
    State(store): State<Arc<CredentialStore<R>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
    R: UserRepository + 'static,
{
    let Json(request) = payload?;
    let outcome = store.login(request).await?;
    Ok(Json(json!({
        "message": "User logged in successfully",
        "token": outcome.token,
        "payload": outcome.payload,
    })))
}
