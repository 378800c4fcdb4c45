use chrono::{DateTime, Utc};
use diesel::prelude::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{UserRole, VerificationStatus};
use crate::schema::{categories, coverage_areas, districts, products, provinces, regencies, users, vendor_categories, vendors};

#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl User {
    // Roles are constrained by the database, an unknown value falls back to the least privileged role
    pub fn user_role(&self) -> UserRole{
        self.role.parse().unwrap_or(UserRole::Client)
    }
}

// User as returned to API callers, without the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfileInfo{
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>
}

impl From<User> for UserProfileInfo {
    fn from(user: User) -> Self {
        let role = user.user_role();

        Self{
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role,
            phone_number: user.phone_number,
            address: user.address,
            avatar_url: user.avatar_url,
            is_active: user.is_active,
            created_at: user.created_at
        }
    }
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = users)]
pub struct UserProfileChanges{
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>
}

impl UserProfileChanges {
    pub fn is_empty(&self) -> bool{
        self.full_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.avatar_url.is_none()
    }
}

#[derive(Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = vendors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Vendor{
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub verification_status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Vendor {
    pub fn status(&self) -> VerificationStatus{
        self.verification_status.parse().unwrap_or(VerificationStatus::Pending)
    }

    pub fn is_verified(&self) -> bool{
        self.status() == VerificationStatus::Verified
    }
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = vendors)]
pub struct VendorChanges{
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>
}

impl VendorChanges {
    pub fn is_empty(&self) -> bool{
        self.business_name.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.phone_number.is_none()
            && self.website.is_none()
            && self.logo_url.is_none()
    }
}

#[derive(Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category{
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = categories)]
pub struct CategoryChanges{
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool{
        self.name.is_none() && self.slug.is_none() && self.description.is_none()
    }
}

#[derive(Queryable, Insertable, Debug, Clone, Copy)]
#[diesel(table_name = vendor_categories)]
pub struct VendorCategory{
    pub vendor_id: Uuid,
    pub category_id: Uuid
}

#[derive(Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product{
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = products)]
pub struct ProductChanges{
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool{
        self.category_id.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = provinces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Province{
    pub id: String,
    pub name: String
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = regencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Regency{
    pub id: String,
    pub province_id: String,
    pub name: String
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = districts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct District{
    pub id: String,
    pub regency_id: String,
    pub name: String
}

#[derive(Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = coverage_areas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CoverageArea{
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub province_id: String,
    pub regency_id: Option<String>,
    pub district_id: Option<String>,
    pub custom_radius_km: Option<i32>,
    pub created_at: DateTime<Utc>
}
