//! `bizdir-auth`: authentication/authorization boundary.
//!
//! Credential hashing, signed identity tokens and the authorization predicate.
//! This crate is decoupled from HTTP and storage: callers hand it principals,
//! plaintexts and tokens, and it hands back decisions.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod token;

pub use authorize::{authorize, Action, AuthzError, Policy};
pub use claims::{validate_claims, TokenClaims, TokenValidationError};
pub use password::{validate_password, CredentialError, CredentialHasher, HashCost, MIN_PASSWORD_LENGTH};
pub use principal::Principal;
pub use token::{Hs256TokenService, SigningSecret, TokenError, TokenVerifier};
