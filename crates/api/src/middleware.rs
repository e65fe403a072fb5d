use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use bizdir_infra::{AppServices, GateError, ServiceError};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

/// Resolve the bearer token through the Auth Gate and attach the principal.
///
/// Any failure ends the request with 401 before the handler runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let principal = extract_authorization(req.headers())
        .and_then(|header| state.services.gate.authenticate(header, Utc::now()))
        .map_err(|e| {
            tracing::debug!(error = %e, "request rejected by auth gate");
            errors::service_error_to_response(ServiceError::from(e))
        })?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

fn extract_authorization(headers: &HeaderMap) -> Result<Option<&str>, GateError> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| GateError::MalformedCredentials))
        .transpose()
}
