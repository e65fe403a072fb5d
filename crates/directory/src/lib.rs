//! Directory domain: users, business listings and the category taxonomy.
//!
//! Records plus their pure create/update rules. Persistence, authorization and
//! password hashing are applied by the services in `bizdir-infra`.

pub mod business;
pub mod category;
pub mod user;

pub use business::{BusinessChanges, BusinessRecord, NewBusiness};
pub use category::{CategoryChanges, CategoryRecord, NewCategory};
pub use user::{NewUser, Profile, UserChanges, UserRecord};
