//! User records.

use bizdir_core::{validation, DomainResult, Entity, UserId};

/// Optional profile details shown on a user's dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl Profile {
    fn normalize(self) -> DomainResult<Self> {
        Ok(Self {
            first_name: validation::optional(self.first_name),
            last_name: validation::optional(self.last_name),
            business_name: validation::optional(self.business_name),
            telephone: validation::optional(self.telephone),
            website: validation::website(self.website)?,
            address: validation::optional(self.address),
        })
    }
}

/// A registered user.
///
/// # Invariants
/// - `email` is trimmed, lower-cased and unique across users.
/// - `password_hash` is always the output of the credential hasher, never a
///   plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub profile: Profile,
}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Registration payload. The password is plaintext until the service hashes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

impl NewUser {
    /// Normalize email and profile fields. The password is checked separately,
    /// by the credential hasher.
    pub fn normalize(self) -> DomainResult<Self> {
        Ok(Self {
            email: validation::email(&self.email)?,
            password: self.password,
            profile: self.profile.normalize()?,
        })
    }
}

impl UserRecord {
    /// Build a fresh non-admin record from a normalized registration.
    pub fn register(new: NewUser, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            email: new.email,
            password_hash,
            is_admin: false,
            profile: new.profile,
        }
    }

    /// Build an admin record. Only used when bootstrapping the first admin.
    pub fn admin(email: String, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            is_admin: true,
            profile: Profile::default(),
        }
    }

    /// Apply a normalized self-update. `password_hash` replaces the stored hash
    /// only when the update carried a new password.
    pub fn apply(&mut self, changes: UserChanges, password_hash: Option<String>) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }

        let p = &mut self.profile;
        let c = changes.profile;
        if let Some(v) = c.first_name {
            p.first_name = validation::optional(Some(v));
        }
        if let Some(v) = c.last_name {
            p.last_name = validation::optional(Some(v));
        }
        if let Some(v) = c.business_name {
            p.business_name = validation::optional(Some(v));
        }
        if let Some(v) = c.telephone {
            p.telephone = validation::optional(Some(v));
        }
        if let Some(v) = c.website {
            p.website = validation::optional(Some(v));
        }
        if let Some(v) = c.address {
            p.address = validation::optional(Some(v));
        }
    }
}

/// Partial self-update. `None` leaves a field untouched; for profile fields a
/// blank string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile: Profile,
}

impl UserChanges {
    pub fn normalize(self) -> DomainResult<Self> {
        let email = self.email.map(|e| validation::email(&e)).transpose()?;
        let mut profile = self.profile;
        // Validate the website shape now; blank still means "clear".
        if let Some(url) = profile.website.take() {
            profile.website = Some(validation::website(Some(url))?.unwrap_or_default());
        }
        Ok(Self {
            email,
            password: self.password,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> NewUser {
        NewUser {
            email: " A@B.com ".to_string(),
            password: "password1".to_string(),
            profile: Profile {
                first_name: Some(" Ada ".to_string()),
                website: Some("".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn register_normalizes_and_defaults_to_member() {
        let new = registration().normalize().unwrap();
        let user = UserRecord::register(new, "$argon2id$stub".to_string());

        assert_eq!(user.email, "a@b.com");
        assert!(!user.is_admin);
        assert_eq!(user.profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.profile.website, None);
    }

    #[test]
    fn register_rejects_invalid_email() {
        let mut new = registration();
        new.email = "nobody".to_string();
        assert!(new.normalize().is_err());
    }

    #[test]
    fn register_rejects_invalid_website() {
        let mut new = registration();
        new.profile.website = Some("ftp://files".to_string());
        assert!(new.normalize().is_err());
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut user = UserRecord::register(registration().normalize().unwrap(), "old".to_string());
        let changes = UserChanges {
            profile: Profile {
                last_name: Some("Lovelace".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
        .normalize()
        .unwrap();

        user.apply(changes, None);

        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.password_hash, "old");
        assert_eq!(user.profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.profile.last_name.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn apply_blank_clears_profile_field() {
        let mut user = UserRecord::register(registration().normalize().unwrap(), "old".to_string());
        let changes = UserChanges {
            profile: Profile {
                first_name: Some("  ".to_string()),
                website: Some("".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
        .normalize()
        .unwrap();

        user.apply(changes, Some("new".to_string()));

        assert_eq!(user.profile.first_name, None);
        assert_eq!(user.profile.website, None);
        assert_eq!(user.password_hash, "new");
    }

    #[test]
    fn changes_reject_invalid_email() {
        let changes = UserChanges {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(changes.normalize().is_err());
    }
}
