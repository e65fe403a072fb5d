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
    Router::new().route("/category/all", get(list_categories))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/category/add", post(create_category))
        .route("/category/update/:id", patch(update_category))
        .route("/category/delete/:id", delete(delete_category))
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.categories.list() {
        Ok(categories) => {
            let items = categories.iter().map(dto::category_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!(items))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    match services.categories.create(principal.principal(), body.into()) {
        Ok(category) => (StatusCode::CREATED, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateCategoryRequest>,
) -> axum::response::Response {
    match services.categories.update(principal.principal(), &id, body.into()) {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.categories.delete(principal.principal(), &id) {
        Ok(category) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Category deleted", "id": category.id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
