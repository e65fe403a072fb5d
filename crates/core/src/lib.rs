//! `bizdir-core`: shared domain building blocks.
//!
//! Identifiers, the domain error type and field validation rules. No IO and no
//! knowledge of HTTP or storage.

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BusinessId, CategoryId, UserId};
