use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction::{get_public_product, get_vendor_by_user_id, list_public_products, list_vendor_products, ProductFilter}, response::{ApiResponse, Paginated}, utils::{get_pooled_connection, DbPool, PageQuery}};

use super::ProductError;

#[derive(Deserialize, Debug)]
pub struct ProductListQuery{
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub search: Option<String>
}

#[tracing::instrument(
    "Listing products",
    skip(pool)
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<ProductListQuery>
) -> Result<HttpResponse, ProductError>{
    let query = query.into_inner();
    let page = PageQuery::new(query.page, query.limit);
    let filter = ProductFilter{
        category_id: query.category_id,
        vendor_id: query.vendor_id,
        search: query.search
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let products = list_public_products(conn, filter, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Products fetched", Paginated::new(products, &page))))
}

#[tracing::instrument(
    "Getting product",
    skip(pool)
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ProductError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let product = get_public_product(conn, path.into_inner())
        .await?
        .ok_or(ProductError::NotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Product fetched", product)))
}

// Every product of the caller's vendor, inactive ones included
#[tracing::instrument(
    "Listing products of current vendor",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn list_my_products(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    page: web::Query<PageQuery>
) -> Result<HttpResponse, ProductError>{
    user.require(Permission::CreateProduct)?;
    let page = page.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vendor = get_vendor_by_user_id(conn, user.user_id)
        .await?
        .ok_or(ProductError::VendorProfileMissing)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let products = list_vendor_products(conn, vendor.id, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Products fetched", Paginated::new(products, &page))))
}
