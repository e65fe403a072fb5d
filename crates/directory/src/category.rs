//! Category taxonomy (admin curated).

use bizdir_core::{validation, CategoryId, DomainResult, Entity};

/// A category businesses are listed under. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Entity for CategoryRecord {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn into_record(self) -> DomainResult<CategoryRecord> {
        Ok(CategoryRecord {
            id: CategoryId::new(),
            name: validation::required("name", &self.name)?,
            description: validation::optional(self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryRecord {
    /// Apply a partial update. Validation runs before anything changes.
    pub fn apply(&mut self, changes: CategoryChanges) -> DomainResult<()> {
        let name = changes
            .name
            .map(|n| validation::required("name", &n))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = validation::optional(Some(description));
        }
        Ok(())
    }
}
