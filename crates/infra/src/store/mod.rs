//! Document storage abstractions.
//!
//! One store per collection (users, businesses, categories). Stores own the
//! uniqueness constraints: a write that would duplicate a unique key is
//! rejected by the store itself, whatever the caller checked beforehand.

pub mod document;
pub mod in_memory;

pub use document::{unique_fold, Document, UniqueKey};
pub use in_memory::InMemoryDocumentStore;

/// Store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A write would duplicate the value of a unique field.
    #[error("{collection}: duplicate value for unique field `{field}`")]
    UniqueViolation {
        collection: &'static str,
        field: &'static str,
    },
    #[error("{collection}: document {id} not found")]
    NotFound { collection: &'static str, id: String },
    #[error("storage error: {0}")]
    Storage(String),
}

/// Collection-scoped document store.
///
/// Filters are plain predicates so the trait stays usable as a trait object.
pub trait DocumentStore<D: Document>: Send + Sync {
    fn get(&self, id: D::Id) -> Result<Option<D>, StoreError>;

    /// All documents matching `filter`, ordered by id (creation order for v7 ids).
    fn find(&self, filter: &dyn Fn(&D) -> bool) -> Result<Vec<D>, StoreError>;

    /// Insert a new document. Fails on an id clash or a unique key clash.
    fn insert(&self, doc: D) -> Result<D, StoreError>;

    /// Replace an existing document. Fails if it does not exist or a unique key
    /// clashes with another document.
    fn update(&self, doc: D) -> Result<D, StoreError>;

    /// Remove a document, returning it if it existed.
    fn delete(&self, id: D::Id) -> Result<Option<D>, StoreError>;

    /// Remove every document matching `filter`. Returns how many were removed.
    fn delete_where(&self, filter: &dyn Fn(&D) -> bool) -> Result<usize, StoreError>;

    fn find_one(&self, filter: &dyn Fn(&D) -> bool) -> Result<Option<D>, StoreError> {
        Ok(self.find(filter)?.into_iter().next())
    }

    fn list(&self) -> Result<Vec<D>, StoreError> {
        self.find(&|_| true)
    }
}
