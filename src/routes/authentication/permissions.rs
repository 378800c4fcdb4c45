use actix_web::HttpResponse;
use serde::Serialize;

use crate::{auth::{role_permissions, AuthenticatedUser, Permission}, domain::UserRole, response::ApiResponse};

#[derive(Serialize)]
pub struct RolePermissions{
    pub role: UserRole,
    pub permissions: &'static [Permission]
}

// Lets clients render role aware views without duplicating the table
#[tracing::instrument(
    "Listing permissions of caller",
    skip_all,
    fields(role = %user.role)
)]
pub async fn permissions(
    user: AuthenticatedUser
) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(
        "Permissions",
        RolePermissions{
            role: user.role,
            permissions: role_permissions(user.role)
        }
    ))
}
