use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{auth::{AuthenticatedUser, Permission}, configuration::UploadSettings, db_interaction::{get_product_with_owner, update_product}, models::ProductChanges, response::ApiResponse, uploads::{read_image, remove_image, store_image, UploadKind}, utils::{get_pooled_connection, DbPool}};

use super::ProductError;

#[tracing::instrument(
    "Uploading product image",
    skip(pool, uploads, user, payload),
    fields(user_id = %user.user_id)
)]
pub async fn upload_product_image(
    pool: web::Data<DbPool>,
    uploads: web::Data<UploadSettings>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: Multipart
) -> Result<HttpResponse, ProductError>{
    user.require(Permission::UpdateProduct)?;
    let product_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let (product, owner_id) = get_product_with_owner(conn, product_id)
        .await?
        .ok_or(ProductError::NotFound)?;

    user.require_owner(Permission::UpdateProduct, owner_id)?;

    let image = read_image(payload, uploads.max_image_bytes).await?;
    let image_url = store_image(&uploads, UploadKind::ProductImage, image).await?;

    let changes = ProductChanges{
        image_url: Some(image_url.clone()),
        ..Default::default()
    };

    let result = async {
        let conn = get_pooled_connection(&pool)
            .await
            .context("Failed to get connection from pool")?;

        let updated = update_product(conn, product_id, changes).await?;
        Ok::<_, ProductError>(updated)
    }.await;

    // The stored file is orphaned unless the row points at it
    let updated = match result {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            remove_image(&uploads, &image_url).await;
            return Err(ProductError::NotFound)
        },
        Err(e) => {
            remove_image(&uploads, &image_url).await;
            return Err(e)
        }
    };

    if let Some(previous) = product.image_url {
        remove_image(&uploads, &previous).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Product image uploaded", updated)))
}
