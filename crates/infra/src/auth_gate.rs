//! Auth Gate: bearer token in, [`Principal`] out.
//!
//! The gate verifies the token signature and time window, then reads the
//! subject's current record so that admin status reflects the store, not the
//! token. That single lookup is its only side effect.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use bizdir_auth::{Principal, TokenError, TokenVerifier};
use bizdir_directory::UserRecord;

use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("No token provided")]
    MissingCredentials,
    #[error("Malformed authorization header")]
    MalformedCredentials,
    #[error("Invalid or expired token")]
    InvalidToken(#[from] TokenError),
    #[error("Token subject no longer exists")]
    UnknownSubject,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the token must be non-empty.
pub fn bearer_token(header: Option<&str>) -> Result<&str, GateError> {
    let value = header.ok_or(GateError::MissingCredentials)?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(GateError::MalformedCredentials)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(GateError::MalformedCredentials);
    }
    Ok(token)
}

pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
    users: Arc<dyn DocumentStore<UserRecord>>,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, users: Arc<dyn DocumentStore<UserRecord>>) -> Self {
        Self { verifier, users }
    }

    /// Resolve the raw `Authorization` header value into a principal.
    pub fn authenticate(&self, header: Option<&str>, now: DateTime<Utc>) -> Result<Principal, GateError> {
        self.resolve(bearer_token(header)?, now)
    }

    /// Resolve a bare token into a principal.
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, GateError> {
        let claims = self.verifier.verify(token, now)?;

        let user = self.users.get(claims.sub)?.ok_or_else(|| {
            tracing::debug!(subject = %claims.sub, "token subject not found");
            GateError::UnknownSubject
        })?;

        Ok(Principal::new(user.id, user.is_admin))
    }
}
