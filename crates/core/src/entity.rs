//! Entity trait: identity + continuity across state changes.

/// A record with a stable identity.
///
/// Users, businesses and categories are all entities; the document store keys
/// every record by this identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
