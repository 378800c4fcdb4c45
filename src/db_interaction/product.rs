use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, PgTextExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use serde::Deserialize;
use uuid::Uuid;

use crate::{domain::VerificationStatus, models::{Product, ProductChanges}, schema::{products, vendors}, telemetry::spawn_blocking_with_tracing, utils::{DbConnection, PageQuery}};

// Filters for the public catalogue
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ProductFilter{
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub search: Option<String>
}

// Escape LIKE wildcards so the search term is matched literally
fn like_pattern(term: &str) -> String{
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{}%", escaped)
}

#[tracing::instrument(
    "Listing public products",
    skip(conn)
)]
pub async fn list_public_products(
    mut conn: DbConnection,
    filter: ProductFilter,
    page: PageQuery
) -> Result<Vec<Product>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        let mut query = products::table
            .inner_join(vendors::table)
            .filter(vendors::verification_status.eq(VerificationStatus::Verified.as_str()))
            .filter(products::is_active.eq(true))
            .select(Product::as_select())
            .into_boxed();

        if let Some(category_id) = filter.category_id {
            query = query.filter(products::category_id.eq(category_id));
        }

        if let Some(vendor_id) = filter.vendor_id {
            query = query.filter(products::vendor_id.eq(vendor_id));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(products::name.ilike(like_pattern(search)));
        }

        query
            .order(products::created_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<Product>(&mut conn)
            .context("Failed to list products")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting public product",
    skip(conn)
)]
pub async fn get_public_product(
    mut conn: DbConnection,
    product_id: Uuid
) -> Result<Option<Product>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        products::table
            .inner_join(vendors::table)
            .filter(products::id.eq(product_id))
            .filter(vendors::verification_status.eq(VerificationStatus::Verified.as_str()))
            .filter(products::is_active.eq(true))
            .select(Product::as_select())
            .first::<Product>(&mut conn)
            .optional()
            .context("Failed to get product")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Listing products of vendor",
    skip(conn)
)]
pub async fn list_vendor_products(
    mut conn: DbConnection,
    vendor_id: Uuid,
    page: PageQuery
) -> Result<Vec<Product>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        products::table
            .filter(products::vendor_id.eq(vendor_id))
            .select(Product::as_select())
            .order(products::created_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<Product>(&mut conn)
            .context("Failed to list vendor products")
    })
    .await
    .context("Failed due to threadpool error")?
}

// Product along with the user id owning its vendor, for ownership checks
#[tracing::instrument(
    "Getting product with owner",
    skip(conn)
)]
pub async fn get_product_with_owner(
    mut conn: DbConnection,
    product_id: Uuid
) -> Result<Option<(Product, Uuid)>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        products::table
            .inner_join(vendors::table)
            .filter(products::id.eq(product_id))
            .select((Product::as_select(), vendors::user_id))
            .first::<(Product, Uuid)>(&mut conn)
            .optional()
            .context("Failed to get product owner")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Inserting product",
    skip(conn, product),
    fields(vendor_id = %product.vendor_id)
)]
pub async fn insert_product(
    mut conn: DbConnection,
    product: Product
) -> Result<Product, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(products::table)
            .values(&product)
            .returning(Product::as_returning())
            .get_result::<Product>(&mut conn)
            .context("Failed to insert product")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Updating product",
    skip(conn)
)]
pub async fn update_product(
    mut conn: DbConnection,
    product_id: Uuid,
    changes: ProductChanges
) -> Result<Option<Product>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(products::table.find(product_id))
            .set((&changes, products::updated_at.eq(Utc::now())))
            .returning(Product::as_returning())
            .get_result::<Product>(&mut conn)
            .optional()
            .context("Failed to update product")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Deleting product",
    skip(conn)
)]
pub async fn delete_product(
    mut conn: DbConnection,
    product_id: Uuid
) -> Result<bool, anyhow::Error>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::delete(products::table.find(product_id))
            .execute(&mut conn)
            .context("Failed to delete product")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected_rows > 0)
}
