use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};

use bizdir_infra::AppServices;

use crate::app::extract::ApiJson;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn public_router() -> Router {
    Router::new().route("/business/all", get(list_businesses))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/business/add-new", post(admin_create))
        .route("/business/update/:id", patch(admin_update))
        .route("/business/delete/:id", delete(admin_delete))
        .route("/business/my-business", get(my_business))
        .route("/business/my-business/add", post(create_own))
        .route("/business/my-business/update/:id", patch(update_own))
        .route("/business/my-business/delete/:id", delete(delete_own))
}

fn deleted(id: impl ToString) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Business deleted", "id": id.to_string() })),
    )
        .into_response()
}

pub async fn list_businesses(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.businesses.list_all() {
        Ok(listings) => {
            let items = listings.iter().map(dto::business_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!(items))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn my_business(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.businesses.my_business(principal.principal()) {
        Ok(listing) => (StatusCode::OK, Json(dto::business_to_json(&listing))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_own(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateBusinessRequest>,
) -> axum::response::Response {
    match services.businesses.create_own(principal.principal(), body.into()) {
        Ok(listing) => (StatusCode::CREATED, Json(dto::business_to_json(&listing))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_own(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateBusinessRequest>,
) -> axum::response::Response {
    match services.businesses.update_own(principal.principal(), &id, body.into()) {
        Ok(listing) => (StatusCode::OK, Json(dto::business_to_json(&listing))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_own(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.businesses.delete_own(principal.principal(), &id) {
        Ok(business) => deleted(business.id),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn admin_create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateBusinessRequest>,
) -> axum::response::Response {
    match services.businesses.admin_create(principal.principal(), body.into()) {
        Ok(listing) => (StatusCode::CREATED, Json(dto::business_to_json(&listing))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn admin_update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateBusinessRequest>,
) -> axum::response::Response {
    match services.businesses.admin_update(principal.principal(), &id, body.into()) {
        Ok(listing) => (StatusCode::OK, Json(dto::business_to_json(&listing))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn admin_delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.businesses.admin_delete(principal.principal(), &id) {
        Ok(business) => deleted(business.id),
        Err(e) => errors::service_error_to_response(e),
    }
}
