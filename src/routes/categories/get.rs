use actix_web::{web, HttpResponse};
use anyhow::Context;
use uuid::Uuid;

use crate::{db_interaction, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::CategoryError;

#[tracing::instrument(
    "Listing categories",
    skip(pool)
)]
pub async fn list_categories(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, CategoryError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let categories = db_interaction::list_categories(conn).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Categories fetched", categories)))
}

#[tracing::instrument(
    "Getting category",
    skip(pool)
)]
pub async fn get_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, CategoryError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let category = db_interaction::get_category_by_id(conn, path.into_inner())
        .await?
        .ok_or(CategoryError::NotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Category fetched", category)))
}
