use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{auth::{AuthenticatedUser, Permission}, configuration::UploadSettings, db_interaction::{self, get_product_with_owner}, response::ApiResponse, uploads::remove_image, utils::{get_pooled_connection, DbPool}};

use super::ProductError;

#[tracing::instrument(
    "Deleting product",
    skip(pool, uploads, user),
    fields(user_id = %user.user_id)
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    uploads: web::Data<UploadSettings>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ProductError>{
    user.require(Permission::DeleteProduct)?;
    let product_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let (product, owner_id) = get_product_with_owner(conn, product_id)
        .await?
        .ok_or(ProductError::NotFound)?;

    user.require_owner(Permission::DeleteProduct, owner_id)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    if !db_interaction::delete_product(conn, product_id).await? {
        return Err(ProductError::NotFound)
    }

    if let Some(image_url) = product.image_url {
        remove_image(&uploads, &image_url).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Product deleted")))
}
