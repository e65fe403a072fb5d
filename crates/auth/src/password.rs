//! Password hashing and verification.
//!
//! Argon2id with a fresh random salt per hash; the PHC string stores the salt
//! and parameters, so verification needs nothing but the stored hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password should be at least 8 characters long")]
    TooShort,

    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Tests only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST.max(8),
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Reject plaintexts that are too short to be stored.
pub fn validate_password(plain: &str) -> Result<(), CredentialError> {
    if plain.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::TooShort);
    }
    Ok(())
}

/// Salted one-way password hasher.
#[derive(Clone)]
pub struct CredentialHasher {
    argon: Argon2<'static>,
    cost: HashCost,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, CredentialError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| CredentialError::Params(e.to_string()))?;

        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            cost,
        })
    }

    pub fn cost(&self) -> HashCost {
        self.cost
    }

    /// Hash a plaintext. Two calls with the same input yield different hashes.
    pub fn hash(&self, plain: &str) -> Result<String, CredentialError> {
        validate_password(plain)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext against a stored hash. A malformed hash never matches.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return false;
            }
        };
        self.argon.verify_password(plain.as_bytes(), &parsed).is_ok()
    }
}

impl core::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialHasher").field("cost", &self.cost).finish()
    }
}
