use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{models::{Category, CategoryChanges}, schema::categories, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Listing categories",
    skip(conn)
)]
pub async fn list_categories(
    mut conn: DbConnection
) -> Result<Vec<Category>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        categories::table
            .select(Category::as_select())
            .order(categories::name.asc())
            .load::<Category>(&mut conn)
            .context("Failed to list categories")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting category by id",
    skip(conn)
)]
pub async fn get_category_by_id(
    mut conn: DbConnection,
    category_id: Uuid
) -> Result<Option<Category>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        categories::table
            .find(category_id)
            .select(Category::as_select())
            .first::<Category>(&mut conn)
            .optional()
            .context("Failed to get category")
    })
    .await
    .context("Failed due to threadpool error")?
}

// Errors associated with inserting / updating categories
#[derive(Error)]
pub enum CategoryWriteError{
    #[error("slug is not unique")]
    SlugNotUnique(#[source] diesel::result::Error),
    #[error("Failed to run query")]
    QueryError(#[source] diesel::result::Error),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError)
}

impl From<diesel::result::Error> for CategoryWriteError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ) => CategoryWriteError::SlugNotUnique(e),
            _ => CategoryWriteError::QueryError(e)
        }
    }
}

impl Debug for CategoryWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting category",
    skip(conn)
)]
pub async fn insert_category(
    mut conn: DbConnection,
    name: String,
    slug: String,
    description: Option<String>
) -> Result<Category, CategoryWriteError>{
    let now = Utc::now();
    let category = Category{
        id: Uuid::new_v4(),
        name,
        slug,
        description,
        created_at: now,
        updated_at: now
    };

    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(categories::table)
            .values(&category)
            .returning(Category::as_returning())
            .get_result::<Category>(&mut conn)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Updating category",
    skip(conn)
)]
pub async fn update_category(
    mut conn: DbConnection,
    category_id: Uuid,
    changes: CategoryChanges
) -> Result<Option<Category>, CategoryWriteError>{
    let res = spawn_blocking_with_tracing(move || {
        diesel::update(categories::table.find(category_id))
            .set((&changes, categories::updated_at.eq(Utc::now())))
            .returning(Category::as_returning())
            .get_result::<Category>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

// Returns false when no category had this id
#[tracing::instrument(
    "Deleting category",
    skip(conn)
)]
pub async fn delete_category(
    mut conn: DbConnection,
    category_id: Uuid
) -> Result<bool, anyhow::Error>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::delete(categories::table.find(category_id))
            .execute(&mut conn)
            .context("Failed to delete category")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected_rows > 0)
}
