//! Business listings.

use bizdir_core::{validation, BusinessId, CategoryId, DomainResult, Entity, UserId};

/// A business listing.
///
/// # Invariants
/// - `name` and `email` are unique across listings.
/// - `category_id` referenced an existing category when last written.
/// - `owner_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub id: BusinessId,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub owner_id: UserId,
    pub category_id: CategoryId,
}

impl Entity for BusinessRecord {
    type Id = BusinessId;

    fn id(&self) -> BusinessId {
        self.id
    }
}

/// Creation payload. `category` is the raw id as submitted; the service
/// resolves it against the category store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBusiness {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub category: String,
}

impl NewBusiness {
    pub fn into_record(self, owner_id: UserId, category_id: CategoryId) -> DomainResult<BusinessRecord> {
        Ok(BusinessRecord {
            id: BusinessId::new(),
            name: validation::required("name", &self.name)?,
            description: validation::required("description", &self.description)?,
            images: clean_images(self.images),
            telephone: validation::optional(self.telephone),
            website: validation::website(self.website)?,
            email: validation::email(&self.email)?,
            address: validation::optional(self.address),
            owner_id,
            category_id,
        })
    }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
}

impl BusinessRecord {
    /// Produce the updated record without touching `self`. The owner is kept.
    ///
    /// `category_id` is the already-resolved category when the update carried
    /// one.
    pub fn updated(&self, changes: BusinessChanges, category_id: Option<CategoryId>) -> DomainResult<Self> {
        let mut next = self.clone();

        if let Some(name) = changes.name {
            next.name = validation::required("name", &name)?;
        }
        if let Some(description) = changes.description {
            next.description = validation::required("description", &description)?;
        }
        if let Some(images) = changes.images {
            next.images = clean_images(images);
        }
        if let Some(telephone) = changes.telephone {
            next.telephone = validation::optional(Some(telephone));
        }
        if let Some(website) = changes.website {
            next.website = validation::website(Some(website))?;
        }
        if let Some(email) = changes.email {
            next.email = validation::email(&email)?;
        }
        if let Some(address) = changes.address {
            next.address = validation::optional(Some(address));
        }
        if let Some(category_id) = category_id {
            next.category_id = category_id;
        }

        Ok(next)
    }
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .filter_map(|i| validation::optional(Some(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_business() -> NewBusiness {
        NewBusiness {
            name: "Hi Plumbing".to_string(),
            description: "Pipes and more".to_string(),
            images: vec!["https://img/1.png".to_string(), "  ".to_string()],
            website: Some("https://hiplumbing.com.au".to_string()),
            email: "Contact@HiPlumbing.com.au".to_string(),
            category: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn into_record_normalizes_fields() {
        let owner = UserId::new();
        let category = CategoryId::new();
        let b = new_business().into_record(owner, category).unwrap();

        assert_eq!(b.email, "contact@hiplumbing.com.au");
        assert_eq!(b.images, vec!["https://img/1.png".to_string()]);
        assert_eq!(b.owner_id, owner);
        assert_eq!(b.category_id, category);
    }

    #[test]
    fn into_record_requires_description() {
        let mut new = new_business();
        new.description = " ".to_string();
        let err = new.into_record(UserId::new(), CategoryId::new()).unwrap_err();
        assert_eq!(err.to_string(), "description is required");
    }

    #[test]
    fn into_record_rejects_bad_website() {
        let mut new = new_business();
        new.website = Some("hiplumbing".to_string());
        assert!(new.into_record(UserId::new(), CategoryId::new()).is_err());
    }

    #[test]
    fn updated_keeps_owner_and_untouched_fields() {
        let owner = UserId::new();
        let b = new_business().into_record(owner, CategoryId::new()).unwrap();
        let new_category = CategoryId::new();

        let next = b
            .updated(
                BusinessChanges {
                    description: Some("Now with gas fitting".to_string()),
                    ..Default::default()
                },
                Some(new_category),
            )
            .unwrap();

        assert_eq!(next.owner_id, owner);
        assert_eq!(next.name, b.name);
        assert_eq!(next.description, "Now with gas fitting");
        assert_eq!(next.category_id, new_category);
    }

    #[test]
    fn updated_validates_without_mutating_original() {
        let b = new_business().into_record(UserId::new(), CategoryId::new()).unwrap();
        let err = b.updated(
            BusinessChanges {
                email: Some("broken".to_string()),
                ..Default::default()
            },
            None,
        );

        assert!(err.is_err());
        assert_eq!(b.email, "contact@hiplumbing.com.au");
    }
}
