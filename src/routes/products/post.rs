use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction::{get_vendor_by_user_id, insert_product}, models::Product, response::{collect_errors, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::{ensure_category_exists, ProductError};

#[derive(Deserialize, Debug, Validate)]
pub struct ProductForm{
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>
}

#[tracing::instrument(
    "Creating product",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    form: web::Json<ProductForm>
) -> Result<HttpResponse, ProductError>{
    user.require(Permission::CreateProduct)?;

    let mut form = form.into_inner();
    form.name = form.name.trim().to_string();
    let errors = collect_errors(form.validate());
    if !errors.is_empty() {
        return Err(ProductError::Validation(errors))
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vendor = get_vendor_by_user_id(conn, user.user_id)
        .await?
        .ok_or(ProductError::VendorProfileMissing)?;

    if !vendor.is_verified() {
        tracing::info!(vendor_id = %vendor.id, status = %vendor.status(), "Unverified vendor tried to create a product");
        return Err(ProductError::VendorNotVerified)
    }

    ensure_category_exists(&pool, form.category_id).await?;

    let now = Utc::now();
    let product = Product{
        id: Uuid::new_v4(),
        vendor_id: vendor.id,
        category_id: form.category_id,
        name: form.name,
        description: form.description,
        price: form.price,
        image_url: None,
        is_active: form.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let product = insert_product(conn, product).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("Product created", product)))
}
