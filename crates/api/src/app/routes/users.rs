use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;

use bizdir_infra::AppServices;

use super::blocking;
use crate::app::extract::ApiJson;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/users/register-account", post(register_account))
        .route("/users/login", post(login))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/update-me", patch(update_me))
        .route("/users/delete-me", delete(delete_me))
        .route("/users/all", get(list_users))
        .route("/users/delete/:user_id", delete(delete_user))
}

pub async fn register_account(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::RegisterRequest>,
) -> axum::response::Response {
    match blocking(move || services.users.register(body.into())).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::LoginRequest>,
) -> axum::response::Response {
    match blocking(move || services.users.login(&body.email, &body.password, Utc::now())).await {
        Ok(jwt) => (StatusCode::OK, Json(serde_json::json!({ "jwt": jwt }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.users.me(principal.principal()) {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::UpdateMeRequest>,
) -> axum::response::Response {
    let principal = *principal.principal();
    match blocking(move || services.users.update_me(&principal, body.into())).await {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.users.delete_me(principal.principal()) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Your account has been deleted" })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.users.list_all(principal.principal()) {
        Ok(users) => {
            let users = users.iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "users": users }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    match services.users.delete_user(principal.principal(), &user_id) {
        Ok(user) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "User deleted", "id": user.id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
