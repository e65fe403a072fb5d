use axum::{routing::get, Router};

use bizdir_infra::{ServiceError, ServiceResult};

pub mod businesses;
pub mod categories;
pub mod system;
pub mod users;

/// Router for endpoints that need no token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(users::public_router())
        .merge(businesses::public_router())
        .merge(categories::public_router())
}

/// Router for endpoints behind the auth gate.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .merge(users::protected_router())
        .merge(businesses::protected_router())
        .merge(categories::protected_router())
}

/// Run a service call on the blocking pool.
///
/// Used for anything that hashes or verifies a password.
pub(crate) async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::internal("blocking task failed", e))?
}
