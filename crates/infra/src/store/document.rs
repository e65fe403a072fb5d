//! Storage bindings for directory records.

use bizdir_core::Entity;
use bizdir_directory::{BusinessRecord, CategoryRecord, UserRecord};

/// One value that must be unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: unique_fold(value),
        }
    }
}

/// Comparison form for unique values: trimmed and lower-cased, so
/// "Hi Plumbing" and "hi plumbing " collide.
pub fn unique_fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A record that can live in a [`DocumentStore`](super::DocumentStore).
pub trait Document: Entity + Clone + Send + Sync + 'static {
    /// Collection name, used in errors and logs.
    const COLLECTION: &'static str;

    /// Values that must not repeat across the collection.
    fn unique_keys(&self) -> Vec<UniqueKey>;
}

impl Document for UserRecord {
    const COLLECTION: &'static str = "users";

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("email", &self.email)]
    }
}

impl Document for BusinessRecord {
    const COLLECTION: &'static str = "businesses";

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("name", &self.name), UniqueKey::new("email", &self.email)]
    }
}

impl Document for CategoryRecord {
    const COLLECTION: &'static str = "categories";

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("name", &self.name)]
    }
}
