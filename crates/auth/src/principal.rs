use bizdir_core::UserId;

/// The authenticated identity attached to a request.
///
/// Built by the auth gate from a verified token plus the current user record,
/// so `is_admin` reflects the record at resolution time rather than whatever
/// was true when the token was issued. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub is_admin: bool,
}

impl Principal {
    pub fn new(id: UserId, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    pub fn member(id: UserId) -> Self {
        Self::new(id, false)
    }

    pub fn admin(id: UserId) -> Self {
        Self::new(id, true)
    }

    /// Whether this principal is the owner of a resource owned by `owner`.
    pub fn owns(&self, owner: UserId) -> bool {
        self.id == owner
    }
}
