use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Document, DocumentStore, StoreError};

/// In-memory document store for dev and tests.
///
/// One `RwLock` per collection. Unique keys are checked while the write lock is
/// held, so two racing inserts of the same key cannot both succeed.
#[derive(Debug)]
pub struct InMemoryDocumentStore<D: Document> {
    inner: RwLock<BTreeMap<D::Id, D>>,
}

impl<D: Document> InMemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<D::Id, D>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Storage(format!("{}: lock poisoned", D::COLLECTION)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<D::Id, D>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Storage(format!("{}: lock poisoned", D::COLLECTION)))
    }
}

impl<D: Document> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `doc` if any of its unique keys is already held by another document.
fn check_unique<D: Document>(map: &BTreeMap<D::Id, D>, doc: &D) -> Result<(), StoreError> {
    let keys = doc.unique_keys();
    let id = doc.id();

    for other in map.values().filter(|o| o.id() != id) {
        let taken = other.unique_keys();
        if let Some(clash) = keys.iter().find(|k| taken.contains(k)) {
            return Err(StoreError::UniqueViolation {
                collection: D::COLLECTION,
                field: clash.field,
            });
        }
    }
    Ok(())
}

impl<D: Document> DocumentStore<D> for InMemoryDocumentStore<D> {
    fn get(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn find(&self, filter: &dyn Fn(&D) -> bool) -> Result<Vec<D>, StoreError> {
        Ok(self.read()?.values().filter(|d| filter(d)).cloned().collect())
    }

    fn insert(&self, doc: D) -> Result<D, StoreError> {
        let mut map = self.write()?;
        if map.contains_key(&doc.id()) {
            return Err(StoreError::UniqueViolation {
                collection: D::COLLECTION,
                field: "id",
            });
        }
        check_unique(&map, &doc)?;

        map.insert(doc.id(), doc.clone());
        Ok(doc)
    }

    fn update(&self, doc: D) -> Result<D, StoreError> {
        let mut map = self.write()?;
        if !map.contains_key(&doc.id()) {
            return Err(StoreError::NotFound {
                collection: D::COLLECTION,
                id: doc.id().to_string(),
            });
        }
        check_unique(&map, &doc)?;

        map.insert(doc.id(), doc.clone());
        Ok(doc)
    }

    fn delete(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        Ok(self.write()?.remove(&id))
    }

    fn delete_where(&self, filter: &dyn Fn(&D) -> bool) -> Result<usize, StoreError> {
        let mut map = self.write()?;
        let before = map.len();
        map.retain(|_, d| !filter(d));
        Ok(before - map.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use bizdir_directory::{CategoryRecord, NewCategory, NewUser, Profile, UserRecord};

    use super::*;

    fn category(name: &str) -> CategoryRecord {
        NewCategory {
            name: name.to_string(),
            description: None,
        }
        .into_record()
        .unwrap()
    }

    fn user(email: &str) -> UserRecord {
        UserRecord::register(
            NewUser {
                email: email.to_string(),
                password: String::new(),
                profile: Profile::default(),
            },
            "hash".to_string(),
        )
    }

    #[test]
    fn insert_then_get_and_list() {
        let store = InMemoryDocumentStore::new();
        let plumbing = store.insert(category("Plumbing")).unwrap();
        let electrical = store.insert(category("Electrical")).unwrap();

        assert_eq!(store.get(plumbing.id).unwrap(), Some(plumbing.clone()));
        assert_eq!(store.list().unwrap(), vec![plumbing, electrical]);
    }

    #[test]
    fn insert_rejects_duplicate_unique_key_ignoring_case() {
        let store = InMemoryDocumentStore::new();
        store.insert(category("Plumbing")).unwrap();

        let err = store.insert(category(" plumbing")).unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueViolation {
                collection: "categories",
                field: "name"
            }
        );
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn update_may_keep_its_own_unique_value() {
        let store = InMemoryDocumentStore::new();
        let mut c = store.insert(category("Plumbing")).unwrap();
        c.description = Some("Pipes".to_string());

        assert!(store.update(c).is_ok());
    }

    #[test]
    fn update_rejects_clash_with_another_document() {
        let store = InMemoryDocumentStore::new();
        store.insert(category("Plumbing")).unwrap();
        let mut other = store.insert(category("Electrical")).unwrap();
        other.name = "Plumbing".to_string();

        assert!(matches!(
            store.update(other),
            Err(StoreError::UniqueViolation { field: "name", .. })
        ));
    }

    #[test]
    fn update_of_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::<CategoryRecord>::new();
        assert!(matches!(
            store.update(category("Plumbing")),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_and_delete_where() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert(user("a@example.com")).unwrap();
        store.insert(user("b@example.com")).unwrap();
        store.insert(user("c@example.com")).unwrap();

        assert_eq!(store.delete(a.id).unwrap().map(|u| u.id), Some(a.id));
        assert_eq!(store.delete(a.id).unwrap(), None);

        let removed = store.delete_where(&|u: &UserRecord| u.email.starts_with('b')).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.find_one(&|_| true).unwrap().map(|u| u.email), Some("c@example.com".to_string()));
    }

    #[test]
    fn concurrent_inserts_of_same_email_admit_exactly_one() {
        let store = Arc::new(InMemoryDocumentStore::<UserRecord>::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert(user("race@example.com")).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
