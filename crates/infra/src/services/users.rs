//! Account lifecycle: registration, login, self-service and admin management.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use bizdir_auth::{authorize, validate_password, Action, CredentialHasher, Hs256TokenService, Principal};
use bizdir_core::{validation, UserId};
use bizdir_directory::{BusinessRecord, NewUser, UserChanges, UserRecord};

use super::{unique_violation, ServiceError, ServiceResult};
use crate::store::{unique_fold, DocumentStore};

const DUPLICATE_EMAIL: &str = "A user with this email address already exists";
const USER_NOT_FOUND: &str = "User not found";

pub struct UserService {
    users: Arc<dyn DocumentStore<UserRecord>>,
    businesses: Arc<dyn DocumentStore<BusinessRecord>>,
    hasher: CredentialHasher,
    tokens: Arc<Hs256TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn DocumentStore<UserRecord>>,
        businesses: Arc<dyn DocumentStore<BusinessRecord>>,
        hasher: CredentialHasher,
        tokens: Arc<Hs256TokenService>,
    ) -> Self {
        Self {
            users,
            businesses,
            hasher,
            tokens,
        }
    }

    /// Create a non-admin account. Hashes the password; CPU bound.
    pub fn register(&self, new: NewUser) -> ServiceResult<UserRecord> {
        let new = new.normalize()?;
        validate_password(&new.password)?;

        if self.email_taken(&new.email, None)? {
            return Err(ServiceError::validation(DUPLICATE_EMAIL));
        }

        let hash = self.hasher.hash(&new.password)?;
        let user = self
            .users
            .insert(UserRecord::register(new, hash))
            .map_err(|e| unique_violation(e, &[("email", DUPLICATE_EMAIL)]))?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token. Verifies a hash; CPU bound.
    pub fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> ServiceResult<String> {
        let email = unique_fold(email);
        let user = self
            .users
            .find_one(&|u: &UserRecord| u.email == email)?
            .ok_or_else(|| ServiceError::validation(USER_NOT_FOUND))?;

        if !self.hasher.verify(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(ServiceError::validation("Incorrect password"));
        }

        Ok(self.tokens.issue(user.id, now)?)
    }

    pub fn me(&self, principal: &Principal) -> ServiceResult<UserRecord> {
        authorize(principal, Action::ReadSelf, None)?;
        self.users
            .get(principal.id)?
            .ok_or_else(|| ServiceError::not_found("No user found"))
    }

    /// Apply a self-update. A new password is re-hashed; CPU bound when present.
    pub fn update_me(&self, principal: &Principal, changes: UserChanges) -> ServiceResult<UserRecord> {
        authorize(principal, Action::UpdateSelf, None)?;
        let mut changes = changes.normalize()?;

        let password_hash = changes
            .password
            .take()
            .map(|p| self.hasher.hash(&p))
            .transpose()?;

        let mut user = self
            .users
            .get(principal.id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

        if let Some(email) = &changes.email {
            if self.email_taken(email, Some(user.id))? {
                return Err(ServiceError::validation(DUPLICATE_EMAIL));
            }
        }

        user.apply(changes, password_hash);
        let user = self
            .users
            .update(user)
            .map_err(|e| unique_violation(e, &[("email", DUPLICATE_EMAIL)]))?;

        tracing::info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Delete the caller's account and every business it owns.
    pub fn delete_me(&self, principal: &Principal) -> ServiceResult<()> {
        authorize(principal, Action::DeleteSelf, None)?;
        self.remove(principal.id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;
        Ok(())
    }

    pub fn list_all(&self, principal: &Principal) -> ServiceResult<Vec<UserRecord>> {
        authorize(principal, Action::ListUsers, None)?;
        Ok(self.users.list()?)
    }

    /// Admin removal of any account, cascading to its businesses.
    ///
    /// `user_id` is the raw path segment; anything that does not parse is
    /// reported as not found.
    pub fn delete_user(&self, principal: &Principal, user_id: &str) -> ServiceResult<UserRecord> {
        authorize(principal, Action::DeleteAnyUser, None)?;
        let id: UserId = user_id
            .parse()
            .map_err(|_| ServiceError::not_found(USER_NOT_FOUND))?;

        let removed = self
            .remove(id)?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;
        tracing::info!(admin_id = %principal.id, user_id = %id, "user deleted by admin");
        Ok(removed)
    }

    /// Make sure an admin account exists for `email`.
    ///
    /// Creates it when missing. An existing account is returned as is: a
    /// non-admin account is never promoted, since anyone could have registered
    /// that address first.
    pub fn ensure_admin(&self, email: &str, password: &str) -> ServiceResult<UserRecord> {
        let email = validation::email(email)?;
        if let Some(existing) = self.users.find_one(&|u: &UserRecord| u.email == email)? {
            if !existing.is_admin {
                tracing::warn!(
                    user_id = %existing.id,
                    "bootstrap admin email belongs to a non-admin account; not promoting"
                );
            }
            return Ok(existing);
        }

        let hash = self.hasher.hash(password)?;
        let admin = self
            .users
            .insert(UserRecord::admin(email, hash))
            .map_err(|e| unique_violation(e, &[("email", DUPLICATE_EMAIL)]))?;

        tracing::info!(user_id = %admin.id, "bootstrap admin created");
        Ok(admin)
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> ServiceResult<bool> {
        let email = unique_fold(email);
        let clash = self
            .users
            .find_one(&|u: &UserRecord| Some(u.id) != except && unique_fold(&u.email) == email)?;
        Ok(clash.is_some())
    }

    /// Delete a user and cascade to owned businesses.
    fn remove(&self, id: UserId) -> ServiceResult<Option<UserRecord>> {
        let Some(user) = self.users.delete(id)? else {
            return Ok(None);
        };
        let businesses = self.businesses.delete_where(&|b: &BusinessRecord| b.owner_id == id)?;
        tracing::info!(user_id = %id, businesses, "user removed");
        Ok(Some(user))
    }
}
