use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::CategoryError;

#[tracing::instrument(
    "Deleting category",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn delete_category(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>
) -> Result<HttpResponse, CategoryError>{
    user.require(Permission::ManageCategories)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    if !db_interaction::delete_category(conn, path.into_inner()).await? {
        return Err(CategoryError::NotFound)
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Category deleted")))
}
