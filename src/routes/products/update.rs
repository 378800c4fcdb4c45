use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction::{self, get_product_with_owner}, models::ProductChanges, response::{collect_errors, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::{ensure_category_exists, ProductError};

#[derive(Deserialize, Debug, Validate)]
pub struct ProductUpdateForm{
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: Option<i64>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>
}

#[tracing::instrument(
    "Updating product",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    form: web::Json<ProductUpdateForm>
) -> Result<HttpResponse, ProductError>{
    user.require(Permission::UpdateProduct)?;
    let product_id = path.into_inner();

    let mut form = form.into_inner();
    form.name = form.name.map(|n| n.trim().to_string());
    let errors = collect_errors(form.validate());
    if !errors.is_empty() {
        return Err(ProductError::Validation(errors))
    }

    let changes = ProductChanges{
        category_id: form.category_id,
        name: form.name,
        description: form.description,
        price: form.price,
        image_url: None,
        is_active: form.is_active
    };

    if changes.is_empty() {
        return Err(ProductError::NothingToUpdate)
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let (_, owner_id) = get_product_with_owner(conn, product_id)
        .await?
        .ok_or(ProductError::NotFound)?;

    user.require_owner(Permission::UpdateProduct, owner_id)?;

    ensure_category_exists(&pool, changes.category_id).await?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let product = db_interaction::update_product(conn, product_id, changes)
        .await?
        .ok_or(ProductError::NotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Product updated", product)))
}
