//! Role based access control.
//!
//! Every role maps to a fixed list of permissions. Operations on a single
//! resource additionally require the caller to own it, except for
//! superadmins who act on any resource they hold the permission for.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserRole;

use super::{errors::AuthError, extractors::AuthenticatedUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission{
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    ManageCategories,
    ManageVendorProfile,
    ManageCoverageAreas,
    VerifyVendors,
    ViewVendors,
    UpdateOwnProfile,
}

impl Permission {
    pub fn as_str(&self) -> &'static str{
        match self {
            Permission::CreateProduct => "CREATE_PRODUCT",
            Permission::UpdateProduct => "UPDATE_PRODUCT",
            Permission::DeleteProduct => "DELETE_PRODUCT",
            Permission::ManageCategories => "MANAGE_CATEGORIES",
            Permission::ManageVendorProfile => "MANAGE_VENDOR_PROFILE",
            Permission::ManageCoverageAreas => "MANAGE_COVERAGE_AREAS",
            Permission::VerifyVendors => "VERIFY_VENDORS",
            Permission::ViewVendors => "VIEW_VENDORS",
            Permission::UpdateOwnProfile => "UPDATE_OWN_PROFILE"
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SUPERADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageCategories,
    Permission::VerifyVendors,
    Permission::ViewVendors,
    Permission::UpdateProduct,
    Permission::DeleteProduct,
    Permission::UpdateOwnProfile,
];

const VENDOR_PERMISSIONS: &[Permission] = &[
    Permission::CreateProduct,
    Permission::UpdateProduct,
    Permission::DeleteProduct,
    Permission::ManageVendorProfile,
    Permission::ManageCoverageAreas,
    Permission::ViewVendors,
    Permission::UpdateOwnProfile,
];

const CLIENT_PERMISSIONS: &[Permission] = &[
    Permission::ViewVendors,
    Permission::UpdateOwnProfile,
];

pub fn role_permissions(role: UserRole) -> &'static [Permission]{
    match role {
        UserRole::SuperAdmin => SUPERADMIN_PERMISSIONS,
        UserRole::Vendor => VENDOR_PERMISSIONS,
        UserRole::Client => CLIENT_PERMISSIONS
    }
}

pub fn has_permission(role: UserRole, permission: Permission) -> bool{
    role_permissions(role).contains(&permission)
}

pub fn can_access_resource(principal: &AuthenticatedUser, permission: Permission, owner_user_id: Uuid) -> bool{
    if !has_permission(principal.role, permission) {
        return false
    }

    principal.role == UserRole::SuperAdmin || principal.user_id == owner_user_id
}

impl AuthenticatedUser {
    pub fn require(&self, permission: Permission) -> Result<(), AuthError>{
        if has_permission(self.role, permission) {
            Ok(())
        } else {
            tracing::info!(user_id = %self.user_id, role = %self.role, %permission, "Permission denied");
            Err(AuthError::MissingPermission(permission))
        }
    }

    pub fn require_owner(&self, permission: Permission, owner_user_id: Uuid) -> Result<(), AuthError>{
        self.require(permission)?;

        if can_access_resource(self, permission, owner_user_id) {
            Ok(())
        } else {
            tracing::info!(user_id = %self.user_id, %owner_user_id, "Ownership check failed");
            Err(AuthError::NotOwner)
        }
    }
}
