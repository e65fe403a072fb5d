//! The authorization predicate.
//!
//! Every guarded operation names an [`Action`]; each action maps to exactly one
//! [`Policy`]. Handlers never branch on `is_admin` themselves.

use thiserror::Error;

use bizdir_core::UserId;

use crate::Principal;

/// Access rule applied after the principal has been resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Any authenticated principal.
    Authenticated,
    /// Admins only.
    AdminOnly,
    /// The resource owner, or any admin.
    OwnerOrAdmin,
}

/// Guarded operations, one per resource-operation pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ReadSelf,
    UpdateSelf,
    DeleteSelf,
    ListUsers,
    DeleteAnyUser,

    CreateCategory,
    UpdateCategory,
    DeleteCategory,

    ReadOwnBusiness,
    CreateOwnBusiness,
    UpdateOwnBusiness,
    DeleteOwnBusiness,
    AdminCreateBusiness,
    AdminUpdateBusiness,
    AdminDeleteBusiness,
}

impl Action {
    pub fn policy(self) -> Policy {
        match self {
            Action::ReadSelf
            | Action::UpdateSelf
            | Action::DeleteSelf
            | Action::ReadOwnBusiness
            | Action::CreateOwnBusiness => Policy::Authenticated,

            Action::UpdateOwnBusiness | Action::DeleteOwnBusiness => Policy::OwnerOrAdmin,

            Action::ListUsers
            | Action::DeleteAnyUser
            | Action::CreateCategory
            | Action::UpdateCategory
            | Action::DeleteCategory
            | Action::AdminCreateBusiness
            | Action::AdminUpdateBusiness
            | Action::AdminDeleteBusiness => Policy::AdminOnly,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {action:?} requires {policy:?}")]
    Forbidden { action: Action, policy: Policy },
}

/// Decide whether `principal` may perform `action`.
///
/// `owner` is the owner of the target resource, when the resource has one.
/// Under `OwnerOrAdmin` a missing owner only admits admins.
///
/// - No IO
/// - No panics
/// - No mutation
pub fn authorize(principal: &Principal, action: Action, owner: Option<UserId>) -> Result<(), AuthzError> {
    let policy = action.policy();
    let allowed = match policy {
        Policy::Authenticated => true,
        Policy::AdminOnly => principal.is_admin,
        Policy::OwnerOrAdmin => principal.is_admin || owner.is_some_and(|o| principal.owns(o)),
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(principal = %principal.id, ?action, ?policy, "authorization denied");
        Err(AuthzError::Forbidden { action, policy })
    }
}
