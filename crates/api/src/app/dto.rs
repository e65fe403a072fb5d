use serde::Deserialize;

use bizdir_directory::{
    BusinessChanges, CategoryChanges, CategoryRecord, NewBusiness, NewCategory, NewUser, Profile, UserChanges,
    UserRecord,
};
use bizdir_infra::services::BusinessListing;

// -------------------------
// Request DTOs
// -------------------------
//
// Bodies are camelCase. Required text fields default to empty so that a
// missing field surfaces as a validation message rather than a parse error.
// Unknown fields (e.g. `isAdmin`) are ignored.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl From<ProfileRequest> for Profile {
    fn from(p: ProfileRequest) -> Self {
        Profile {
            first_name: p.first_name,
            last_name: p.last_name,
            business_name: p.business_name,
            telephone: p.telephone,
            website: p.website,
            address: p.address,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

impl From<RegisterRequest> for NewUser {
    fn from(r: RegisterRequest) -> Self {
        NewUser {
            email: r.email,
            password: r.password,
            profile: r.profile.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

impl From<UpdateMeRequest> for UserChanges {
    fn from(r: UpdateMeRequest) -> Self {
        UserChanges {
            email: r.email,
            password: r.password,
            profile: r.profile.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[serde(default, alias = "businessName")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub email: String,
    pub address: Option<String>,
    #[serde(default, alias = "category")]
    pub category_id: String,
}

impl From<CreateBusinessRequest> for NewBusiness {
    fn from(r: CreateBusinessRequest) -> Self {
        NewBusiness {
            name: r.name,
            description: r.description,
            images: r.images,
            telephone: r.telephone,
            website: r.website,
            email: r.email,
            address: r.address,
            category: r.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    #[serde(alias = "businessName")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "category")]
    pub category_id: Option<String>,
}

impl From<UpdateBusinessRequest> for BusinessChanges {
    fn from(r: UpdateBusinessRequest) -> Self {
        BusinessChanges {
            name: r.name,
            description: r.description,
            images: r.images,
            telephone: r.telephone,
            website: r.website,
            email: r.email,
            address: r.address,
            category: r.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(r: CreateCategoryRequest) -> Self {
        NewCategory {
            name: r.name,
            description: r.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateCategoryRequest> for CategoryChanges {
    fn from(r: UpdateCategoryRequest) -> Self {
        CategoryChanges {
            name: r.name,
            description: r.description,
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

/// Public view of a user. The password hash never leaves the service.
pub fn user_to_json(user: &UserRecord) -> serde_json::Value {
    let p = &user.profile;
    serde_json::json!({
        "id": user.id.to_string(),
        "email": user.email,
        "isAdmin": user.is_admin,
        "firstName": p.first_name,
        "lastName": p.last_name,
        "businessName": p.business_name,
        "telephone": p.telephone,
        "website": p.website,
        "address": p.address,
    })
}

pub fn category_to_json(category: &CategoryRecord) -> serde_json::Value {
    serde_json::json!({
        "id": category.id.to_string(),
        "name": category.name,
        "description": category.description,
    })
}

/// Business with its category embedded.
pub fn business_to_json(listing: &BusinessListing) -> serde_json::Value {
    let b = &listing.business;
    serde_json::json!({
        "id": b.id.to_string(),
        "name": b.name,
        "description": b.description,
        "images": b.images,
        "telephone": b.telephone,
        "website": b.website,
        "email": b.email,
        "address": b.address,
        "ownerId": b.owner_id.to_string(),
        "category": listing.category.as_ref().map(category_to_json),
    })
}
