use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::VerificationStatus, models::{Category, Vendor, VendorCategory, VendorChanges}, schema::{categories, vendor_categories, vendors}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection, PageQuery}};

#[tracing::instrument(
    "Getting vendor of user",
    skip(conn)
)]
pub async fn get_vendor_by_user_id(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Option<Vendor>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        vendors::table
            .filter(vendors::user_id.eq(user_id))
            .select(Vendor::as_select())
            .first::<Vendor>(&mut conn)
            .optional()
            .context("Failed to get vendor by user id")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting vendor by id",
    skip(conn)
)]
pub async fn get_vendor_by_id(
    mut conn: DbConnection,
    vendor_id: Uuid
) -> Result<Option<Vendor>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        vendors::table
            .find(vendor_id)
            .select(Vendor::as_select())
            .first::<Vendor>(&mut conn)
            .optional()
            .context("Failed to get vendor by id")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Listing vendors",
    skip(conn)
)]
pub async fn list_vendors(
    mut conn: DbConnection,
    status: Option<VerificationStatus>,
    page: PageQuery
) -> Result<Vec<Vendor>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        let mut query = vendors::table
            .select(Vendor::as_select())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(vendors::verification_status.eq(status.as_str()));
        }

        query
            .order(vendors::created_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .load::<Vendor>(&mut conn)
            .context("Failed to list vendors")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Updating vendor profile in db",
    skip(conn)
)]
pub async fn update_vendor(
    mut conn: DbConnection,
    vendor_id: Uuid,
    changes: VendorChanges
) -> Result<Option<Vendor>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(vendors::table.find(vendor_id))
            .set((&changes, vendors::updated_at.eq(Utc::now())))
            .returning(Vendor::as_returning())
            .get_result::<Vendor>(&mut conn)
            .optional()
            .context("Failed to update vendor")
    })
    .await
    .context("Failed due to threadpool error")?
}

// The rejection reason is kept only while the vendor is rejected
#[tracing::instrument(
    "Setting vendor verification status",
    skip(conn)
)]
pub async fn set_verification_status(
    mut conn: DbConnection,
    vendor_id: Uuid,
    status: VerificationStatus,
    rejection_reason: Option<String>
) -> Result<Option<Vendor>, anyhow::Error>{
    let rejection_reason = match status {
        VerificationStatus::Rejected => rejection_reason,
        _ => None
    };

    spawn_blocking_with_tracing(move || {
        diesel::update(vendors::table.find(vendor_id))
            .set((
                vendors::verification_status.eq(status.as_str()),
                vendors::rejection_reason.eq(rejection_reason),
                vendors::updated_at.eq(Utc::now())
            ))
            .returning(Vendor::as_returning())
            .get_result::<Vendor>(&mut conn)
            .optional()
            .context("Failed to update verification status")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting vendor categories",
    skip(conn)
)]
pub async fn get_vendor_categories(
    mut conn: DbConnection,
    vendor_id: Uuid
) -> Result<Vec<Category>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        load_vendor_categories(&mut conn, vendor_id)
            .context("Failed to get vendor categories")
    })
    .await
    .context("Failed due to threadpool error")?
}

fn load_vendor_categories(conn: &mut DbConnection, vendor_id: Uuid) -> diesel::QueryResult<Vec<Category>>{
    vendor_categories::table
        .inner_join(categories::table)
        .filter(vendor_categories::vendor_id.eq(vendor_id))
        .select(Category::as_select())
        .order(categories::name.asc())
        .load::<Category>(conn)
}

// Error associated with replacing the category set of a vendor
#[derive(Error)]
pub enum ReplaceCategoriesError{
    #[error("Unknown category ids: {0:?}")]
    UnknownCategories(Vec<Uuid>),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError)
}

impl Debug for ReplaceCategoriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Replacing vendor categories",
    skip(conn)
)]
pub async fn replace_vendor_categories(
    mut conn: DbConnection,
    vendor_id: Uuid,
    category_ids: Vec<Uuid>
) -> Result<Vec<Category>, ReplaceCategoriesError>{
    let mut category_ids = category_ids;
    category_ids.sort();
    category_ids.dedup();

    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Vec<Category>, ReplaceCategoriesError, _>(|conn| {
            let found: Vec<Uuid> = categories::table
                .filter(categories::id.eq_any(category_ids.clone()))
                .select(categories::id)
                .load::<Uuid>(conn)?;

            let missing: Vec<Uuid> = category_ids
                .iter()
                .filter(|id| !found.contains(id))
                .copied()
                .collect();

            if !missing.is_empty() {
                return Err(ReplaceCategoriesError::UnknownCategories(missing))
            }

            diesel::delete(vendor_categories::table.filter(vendor_categories::vendor_id.eq(vendor_id)))
                .execute(conn)?;

            let rows: Vec<VendorCategory> = category_ids
                .iter()
                .map(|category_id| VendorCategory{ vendor_id, category_id: *category_id })
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(vendor_categories::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(load_vendor_categories(conn, vendor_id)?)
        })
    })
    .await??;

    Ok(res)
}
