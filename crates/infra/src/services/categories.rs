//! Category taxonomy. Reads are public; every write is admin only.

use std::sync::Arc;

use bizdir_auth::{authorize, Action, Principal};
use bizdir_core::CategoryId;
use bizdir_directory::{BusinessRecord, CategoryChanges, CategoryRecord, NewCategory};

use super::{unique_violation, ServiceError, ServiceResult};
use crate::store::{unique_fold, DocumentStore};

const DUPLICATE_NAME: &str = "Category already exists";
const NOT_FOUND: &str = "Category not found";

pub struct CategoryService {
    categories: Arc<dyn DocumentStore<CategoryRecord>>,
    businesses: Arc<dyn DocumentStore<BusinessRecord>>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn DocumentStore<CategoryRecord>>,
        businesses: Arc<dyn DocumentStore<BusinessRecord>>,
    ) -> Self {
        Self {
            categories,
            businesses,
        }
    }

    pub fn list(&self) -> ServiceResult<Vec<CategoryRecord>> {
        Ok(self.categories.list()?)
    }

    pub fn create(&self, principal: &Principal, new: NewCategory) -> ServiceResult<CategoryRecord> {
        authorize(principal, Action::CreateCategory, None)?;
        let record = new.into_record()?;
        self.check_unique(&record)?;

        let category = self
            .categories
            .insert(record)
            .map_err(|e| unique_violation(e, &[("name", DUPLICATE_NAME)]))?;
        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn update(&self, principal: &Principal, id: &str, changes: CategoryChanges) -> ServiceResult<CategoryRecord> {
        authorize(principal, Action::UpdateCategory, None)?;
        let mut category = self.load(id)?;
        category.apply(changes)?;
        self.check_unique(&category)?;

        let category = self
            .categories
            .update(category)
            .map_err(|e| unique_violation(e, &[("name", DUPLICATE_NAME)]))?;
        tracing::info!(category_id = %category.id, "category updated");
        Ok(category)
    }

    /// Delete a category no listing refers to.
    pub fn delete(&self, principal: &Principal, id: &str) -> ServiceResult<CategoryRecord> {
        authorize(principal, Action::DeleteCategory, None)?;
        let category = self.load(id)?;

        let in_use = self
            .businesses
            .find(&|b: &BusinessRecord| b.category_id == category.id)?
            .len();
        if in_use > 0 {
            return Err(ServiceError::validation(format!(
                "Category is still used by {in_use} business listing(s)"
            )));
        }

        let removed = self
            .categories
            .delete(category.id)?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        tracing::info!(category_id = %removed.id, "category deleted");
        Ok(removed)
    }

    fn load(&self, id: &str) -> ServiceResult<CategoryRecord> {
        let id: CategoryId = id.parse().map_err(|_| ServiceError::not_found(NOT_FOUND))?;
        self.categories
            .get(id)?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
    }

    fn check_unique(&self, record: &CategoryRecord) -> ServiceResult<()> {
        let (id, name) = (record.id, unique_fold(&record.name));
        let clash = self
            .categories
            .find_one(&|c: &CategoryRecord| c.id != id && unique_fold(&c.name) == name)?;
        match clash {
            Some(_) => Err(ServiceError::validation(DUPLICATE_NAME)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use bizdir_directory::NewBusiness;

    use super::super::testing::{admin, category, member, services};
    use super::*;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            description: Some(format!("All things {name}")),
        }
    }

    #[test]
    fn list_is_public_and_may_be_empty() {
        let s = services();
        assert!(s.categories.list().unwrap().is_empty());
    }

    #[test]
    fn writes_are_admin_only() {
        let s = services();
        let a = admin(&s);
        let p = member(&s, "jane@example.com");
        let c = category(&s, &a, "Plumbing");

        assert!(matches!(
            s.categories.create(&p, new_category("Gas")),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            s.categories.update(&p, &c.id.to_string(), CategoryChanges::default()),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            s.categories.delete(&p, &c.id.to_string()),
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(s.categories.list().unwrap(), vec![c]);
    }

    #[test]
    fn duplicate_names_are_rejected_on_create_and_update() {
        let s = services();
        let a = admin(&s);
        category(&s, &a, "Plumbing");
        let gas = category(&s, &a, "Gas");

        assert_eq!(
            s.categories.create(&a, new_category("PLUMBING")),
            Err(ServiceError::validation(DUPLICATE_NAME))
        );
        assert_eq!(
            s.categories.update(
                &a,
                &gas.id.to_string(),
                CategoryChanges {
                    name: Some("plumbing".to_string()),
                    ..Default::default()
                }
            ),
            Err(ServiceError::validation(DUPLICATE_NAME))
        );
    }

    #[test]
    fn update_renames_and_keeps_id() {
        let s = services();
        let a = admin(&s);
        let c = category(&s, &a, "Plumbing");

        let renamed = s
            .categories
            .update(
                &a,
                &c.id.to_string(),
                CategoryChanges {
                    name: Some("Plumbing & Gas".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.id, c.id);
        assert_eq!(renamed.name, "Plumbing & Gas");
    }

    #[test]
    fn missing_category_is_not_found() {
        let s = services();
        let a = admin(&s);
        assert_eq!(
            s.categories.delete(&a, &CategoryId::new().to_string()),
            Err(ServiceError::not_found(NOT_FOUND))
        );
        assert_eq!(
            s.categories.update(&a, "nope", CategoryChanges::default()),
            Err(ServiceError::not_found(NOT_FOUND))
        );
    }

    #[test]
    fn category_in_use_cannot_be_deleted() {
        let s = services();
        let a = admin(&s);
        let c = category(&s, &a, "Plumbing");
        s.businesses
            .admin_create(
                &a,
                NewBusiness {
                    name: "Pipes Co".to_string(),
                    description: "Pipes".to_string(),
                    email: "hello@pipes.co".to_string(),
                    category: c.id.to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(matches!(
            s.categories.delete(&a, &c.id.to_string()),
            Err(ServiceError::Validation(_))
        ));

        let unused = category(&s, &a, "Gas");
        assert_eq!(s.categories.delete(&a, &unused.id.to_string()).unwrap().id, unused.id);
    }
}
