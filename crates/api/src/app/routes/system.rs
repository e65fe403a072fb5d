use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    let p = principal.principal();
    Json(serde_json::json!({
        "id": p.id.to_string(),
        "isAdmin": p.is_admin,
    }))
}
