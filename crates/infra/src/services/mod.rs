//! Resource services: the application layer between HTTP handlers and stores.
//!
//! Every guarded operation takes the resolved `Principal` and runs the
//! authorization predicate itself, before any store mutation. Handlers never
//! decide access on their own.
//!
//! ```text
//! Principal + input
//!   ↓
//! 1. normalize/validate input (no IO)
//!   ↓
//! 2. authorize (admin-only ops before lookup; owner-or-admin after)
//!   ↓
//! 3. friendly pre-checks (duplicates, references)
//!   ↓
//! 4. store write (uniqueness enforced by the store)
//! ```

pub mod businesses;
pub mod categories;
pub mod users;

use std::sync::Arc;

use thiserror::Error;

use bizdir_auth::{AuthzError, CredentialError, CredentialHasher, Hs256TokenService, TokenError};
use bizdir_core::DomainError;
use bizdir_directory::{BusinessRecord, CategoryRecord, UserRecord};

use crate::auth_gate::{AuthGate, GateError};
use crate::config::{AppConfig, ConfigError};
use crate::store::{DocumentStore, InMemoryDocumentStore, StoreError};

pub use businesses::{BusinessListing, BusinessService};
pub use categories::CategoryService;
pub use users::UserService;

/// Message used for every `Internal` error shown to a caller.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Service-level error. Each variant maps to one HTTP status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// 400. The message is safe to show.
    #[error("{0}")]
    Validation(String),
    /// 401.
    #[error("{0}")]
    Unauthenticated(String),
    /// 403.
    #[error("{0}")]
    Forbidden(String),
    /// 404.
    #[error("{0}")]
    NotFound(String),
    /// 500. Already logged where it was raised; the detail never leaves the
    /// process.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Log an unexpected failure and wrap it.
    pub fn internal(context: &str, err: impl core::fmt::Display) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(format!("{context}: {err}"))
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden { .. } => {
                ServiceError::Forbidden("You are not allowed to perform this action".to_string())
            }
        }
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        match value {
            CredentialError::TooShort => ServiceError::Validation(value.to_string()),
            other => ServiceError::internal("password hashing failed", other),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(_) => ServiceError::internal("token signing failed", value),
            _ => ServiceError::Unauthenticated("Invalid or expired token".to_string()),
        }
    }
}

/// Store failures that the service did not map to a friendlier message.
impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation { field, .. } => {
                ServiceError::Validation(format!("A record with this {field} already exists"))
            }
            StoreError::NotFound { collection, .. } => ServiceError::NotFound(not_found_message(collection)),
            other => ServiceError::internal("store operation failed", other),
        }
    }
}

/// A record vanished between load and write, typically a concurrent delete.
fn not_found_message(collection: &str) -> String {
    match collection {
        "users" => "User not found".to_string(),
        "businesses" => "Business not found".to_string(),
        "categories" => "Category not found".to_string(),
        other => format!("No such record in {other}"),
    }
}

impl From<GateError> for ServiceError {
    fn from(value: GateError) -> Self {
        match value {
            GateError::Store(err) => err.into(),
            other => ServiceError::Unauthenticated(other.to_string()),
        }
    }
}

/// Map a unique violation on a known field to its friendly message; anything
/// else falls through to the generic mapping.
pub(crate) fn unique_violation(err: StoreError, messages: &[(&str, &str)]) -> ServiceError {
    if let StoreError::UniqueViolation { field, .. } = &err {
        if let Some((_, msg)) = messages.iter().find(|(f, _)| f == field) {
            return ServiceError::Validation((*msg).to_string());
        }
    }
    err.into()
}

/// The three collections the directory persists.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn DocumentStore<UserRecord>>,
    pub businesses: Arc<dyn DocumentStore<BusinessRecord>>,
    pub categories: Arc<dyn DocumentStore<CategoryRecord>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryDocumentStore::new()),
            businesses: Arc::new(InMemoryDocumentStore::new()),
            categories: Arc::new(InMemoryDocumentStore::new()),
        }
    }
}

/// Application services container, shared by every request handler.
pub struct AppServices {
    pub gate: AuthGate,
    pub users: UserService,
    pub businesses: BusinessService,
    pub categories: CategoryService,
}

impl AppServices {
    pub fn new(stores: Stores, hasher: CredentialHasher, tokens: Arc<Hs256TokenService>) -> Self {
        Self {
            gate: AuthGate::new(tokens.clone(), stores.users.clone()),
            users: UserService::new(stores.users.clone(), stores.businesses.clone(), hasher, tokens),
            businesses: BusinessService::new(
                stores.businesses.clone(),
                stores.categories.clone(),
                stores.users.clone(),
            ),
            categories: CategoryService::new(stores.categories, stores.businesses),
        }
    }

    /// Wire services over fresh in-memory stores using `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let tokens = Hs256TokenService::new(config.signing_secret()?, config.token_ttl());
        let hasher = CredentialHasher::new(config.password)
            .map_err(|e| ConfigError::InvalidPasswordCost(e.to_string()))?;
        Ok(Self::new(Stores::in_memory(), hasher, Arc::new(tokens)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the service tests.

    use chrono::Duration;

    use bizdir_auth::{HashCost, Principal, SigningSecret};
    use bizdir_directory::{NewCategory, NewUser, Profile};

    use super::*;

    pub fn services() -> AppServices {
        let tokens = Hs256TokenService::new(&SigningSecret::new("test-secret"), Duration::hours(1));
        let hasher = CredentialHasher::new(HashCost::minimal()).unwrap();
        AppServices::new(Stores::in_memory(), hasher, Arc::new(tokens))
    }

    pub fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "password123".to_string(),
            profile: Profile::default(),
        }
    }

    pub fn member(services: &AppServices, email: &str) -> Principal {
        let user = services.users.register(new_user(email)).unwrap();
        Principal::member(user.id)
    }

    pub fn admin(services: &AppServices) -> Principal {
        let user = services
            .users
            .ensure_admin("admin@example.com", "admin-password")
            .unwrap();
        Principal::admin(user.id)
    }

    pub fn category(services: &AppServices, admin: &Principal, name: &str) -> CategoryRecord {
        services
            .categories
            .create(
                admin,
                NewCategory {
                    name: name.to_string(),
                    description: None,
                },
            )
            .unwrap()
    }
}
