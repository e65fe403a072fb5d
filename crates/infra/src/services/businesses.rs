//! Business listings: public browse, owner self-service, admin management.

use std::sync::Arc;

use bizdir_auth::{authorize, Action, Principal};
use bizdir_core::{BusinessId, CategoryId};
use bizdir_directory::{BusinessChanges, BusinessRecord, CategoryRecord, NewBusiness, UserRecord};

use super::{unique_violation, ServiceError, ServiceResult};
use crate::store::{unique_fold, DocumentStore};

const DUPLICATE_NAME: &str = "A business with this name already exists";
const DUPLICATE_EMAIL: &str = "A business with this email address already exists";
const INVALID_CATEGORY: &str = "Invalid category ID";
const NOT_FOUND: &str = "Business not found";
const ACTOR_NOT_FOUND: &str = "User not found";

const UNIQUE_MESSAGES: &[(&str, &str)] = &[("name", DUPLICATE_NAME), ("email", DUPLICATE_EMAIL)];

/// A business with its category populated, as returned to callers.
///
/// `category` is `None` only if the category vanished after the listing was
/// written, which category deletion prevents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessListing {
    pub business: BusinessRecord,
    pub category: Option<CategoryRecord>,
}

pub struct BusinessService {
    businesses: Arc<dyn DocumentStore<BusinessRecord>>,
    categories: Arc<dyn DocumentStore<CategoryRecord>>,
    users: Arc<dyn DocumentStore<UserRecord>>,
}

impl BusinessService {
    pub fn new(
        businesses: Arc<dyn DocumentStore<BusinessRecord>>,
        categories: Arc<dyn DocumentStore<CategoryRecord>>,
        users: Arc<dyn DocumentStore<UserRecord>>,
    ) -> Self {
        Self {
            businesses,
            categories,
            users,
        }
    }

    /// Every listing. Public; an empty directory is reported as not found.
    pub fn list_all(&self) -> ServiceResult<Vec<BusinessListing>> {
        let businesses = self.businesses.list()?;
        if businesses.is_empty() {
            return Err(ServiceError::not_found("No businesses found"));
        }
        businesses.into_iter().map(|b| self.populate(b)).collect()
    }

    pub fn my_business(&self, principal: &Principal) -> ServiceResult<BusinessListing> {
        authorize(principal, Action::ReadOwnBusiness, None)?;
        let business = self
            .owned_by(principal)?
            .ok_or_else(|| ServiceError::not_found("You have not created a business yet"))?;
        self.populate(business)
    }

    /// Self-service create, limited to one listing per owner.
    ///
    /// The one-per-owner rule is checked here only, not by the store, so two
    /// concurrent creates by the same owner can both pass it.
    pub fn create_own(&self, principal: &Principal, new: NewBusiness) -> ServiceResult<BusinessListing> {
        authorize(principal, Action::CreateOwnBusiness, None)?;
        if self.owned_by(principal)?.is_some() {
            return Err(ServiceError::validation("You already have a business listed"));
        }
        self.create(principal, new)
    }

    /// Admin create. The acting admin becomes the owner.
    pub fn admin_create(&self, principal: &Principal, new: NewBusiness) -> ServiceResult<BusinessListing> {
        authorize(principal, Action::AdminCreateBusiness, None)?;
        self.create(principal, new)
    }

    /// Owner-or-admin update. A missing listing is reported before a denial.
    pub fn update_own(
        &self,
        principal: &Principal,
        id: &str,
        changes: BusinessChanges,
    ) -> ServiceResult<BusinessListing> {
        let current = self.load(id)?;
        authorize(principal, Action::UpdateOwnBusiness, Some(current.owner_id))?;
        self.update(principal, current, changes)
    }

    /// Admin update of any listing. Ownership is never reassigned.
    pub fn admin_update(
        &self,
        principal: &Principal,
        id: &str,
        changes: BusinessChanges,
    ) -> ServiceResult<BusinessListing> {
        authorize(principal, Action::AdminUpdateBusiness, None)?;
        let current = self.load(id)?;
        self.update(principal, current, changes)
    }

    pub fn delete_own(&self, principal: &Principal, id: &str) -> ServiceResult<BusinessRecord> {
        let current = self.load(id)?;
        authorize(principal, Action::DeleteOwnBusiness, Some(current.owner_id))?;
        self.remove(principal, current.id)
    }

    pub fn admin_delete(&self, principal: &Principal, id: &str) -> ServiceResult<BusinessRecord> {
        authorize(principal, Action::AdminDeleteBusiness, None)?;
        let current = self.load(id)?;
        self.remove(principal, current.id)
    }

    fn create(&self, principal: &Principal, new: NewBusiness) -> ServiceResult<BusinessListing> {
        let category = self.resolve_category(&new.category)?;
        let record = new.into_record(principal.id, category.id)?;
        self.check_unique(&record)?;
        self.ensure_actor_exists(principal)?;

        let business = self
            .businesses
            .insert(record)
            .map_err(|e| unique_violation(e, UNIQUE_MESSAGES))?;

        // The owner's cascade deletes the user before its listings, so a
        // listing inserted after the check above is either caught by that
        // cascade or by this second look.
        if let Err(err) = self.ensure_actor_exists(principal) {
            self.businesses.delete(business.id)?;
            tracing::info!(business_id = %business.id, owner_id = %principal.id, "listing withdrawn: owner deleted");
            return Err(err);
        }

        tracing::info!(business_id = %business.id, owner_id = %business.owner_id, "business created");
        Ok(BusinessListing {
            business,
            category: Some(category),
        })
    }

    fn update(
        &self,
        principal: &Principal,
        current: BusinessRecord,
        mut changes: BusinessChanges,
    ) -> ServiceResult<BusinessListing> {
        let category_id = changes
            .category
            .take()
            .map(|raw| self.resolve_category(&raw).map(|c| c.id))
            .transpose()?;

        let next = current.updated(changes, category_id)?;
        self.check_unique(&next)?;
        self.ensure_actor_exists(principal)?;

        let business = self
            .businesses
            .update(next)
            .map_err(|e| unique_violation(e, UNIQUE_MESSAGES))?;

        tracing::info!(business_id = %business.id, actor_id = %principal.id, "business updated");
        self.populate(business)
    }

    fn remove(&self, principal: &Principal, id: BusinessId) -> ServiceResult<BusinessRecord> {
        let removed = self
            .businesses
            .delete(id)?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        tracing::info!(business_id = %id, actor_id = %principal.id, "business deleted");
        Ok(removed)
    }

    fn load(&self, id: &str) -> ServiceResult<BusinessRecord> {
        let id: BusinessId = id.parse().map_err(|_| ServiceError::not_found(NOT_FOUND))?;
        self.businesses
            .get(id)?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
    }

    /// The principal was resolved before the handler ran; its account may
    /// have been deleted since.
    fn ensure_actor_exists(&self, principal: &Principal) -> ServiceResult<()> {
        match self.users.get(principal.id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(ACTOR_NOT_FOUND)),
        }
    }

    fn owned_by(&self, principal: &Principal) -> ServiceResult<Option<BusinessRecord>> {
        let owner = principal.id;
        Ok(self.businesses.find_one(&|b: &BusinessRecord| b.owner_id == owner)?)
    }

    fn resolve_category(&self, raw: &str) -> ServiceResult<CategoryRecord> {
        let id: CategoryId = raw
            .parse()
            .map_err(|_| ServiceError::validation(INVALID_CATEGORY))?;
        self.categories
            .get(id)?
            .ok_or_else(|| ServiceError::validation(INVALID_CATEGORY))
    }

    /// Friendly duplicate messages ahead of the store constraint.
    fn check_unique(&self, record: &BusinessRecord) -> ServiceResult<()> {
        let (id, name, email) = (record.id, unique_fold(&record.name), unique_fold(&record.email));
        let others = self.businesses.find(&|b: &BusinessRecord| b.id != id)?;

        if others.iter().any(|b| unique_fold(&b.name) == name) {
            return Err(ServiceError::validation(DUPLICATE_NAME));
        }
        if others.iter().any(|b| unique_fold(&b.email) == email) {
            return Err(ServiceError::validation(DUPLICATE_EMAIL));
        }
        Ok(())
    }

    fn populate(&self, business: BusinessRecord) -> ServiceResult<BusinessListing> {
        let category = self.categories.get(business.category_id)?;
        Ok(BusinessListing { business, category })
    }
}
