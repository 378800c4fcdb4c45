use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::{validate_coverage_area, CoverageAreaRequest, CoverageValidationError, ResolvedRegions}, models::CoverageArea, schema::{coverage_areas, vendors}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

use super::region::{find_district, find_province, find_regency};

#[tracing::instrument(
    "Listing coverage areas of vendor",
    skip(conn)
)]
pub async fn list_coverage_areas(
    mut conn: DbConnection,
    vendor_id: Uuid
) -> Result<Vec<CoverageArea>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        load_coverage_areas(&mut conn, vendor_id)
    })
    .await
    .context("Failed due to threadpool error")?
}

fn load_coverage_areas(conn: &mut DbConnection, vendor_id: Uuid) -> Result<Vec<CoverageArea>, anyhow::Error>{
    coverage_areas::table
        .filter(coverage_areas::vendor_id.eq(vendor_id))
        .select(CoverageArea::as_select())
        .order(coverage_areas::created_at.asc())
        .load::<CoverageArea>(conn)
        .context("Failed to list coverage areas")
}

// Errors associated with declaring a new coverage area
#[derive(Error)]
pub enum AddCoverageAreaError{
    #[error(transparent)]
    Invalid(#[from] CoverageValidationError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl From<diesel::result::Error> for AddCoverageAreaError {
    fn from(e: diesel::result::Error) -> Self {
        AddCoverageAreaError::UnexpectedError(e.into())
    }
}

impl Debug for AddCoverageAreaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Resolves the named regions, validates the area against them and the
// vendor's existing areas, then inserts it. Runs in one transaction.
#[tracing::instrument(
    "Adding coverage area",
    skip(conn)
)]
pub async fn add_coverage_area(
    mut conn: DbConnection,
    vendor_id: Uuid,
    request: CoverageAreaRequest
) -> Result<CoverageArea, AddCoverageAreaError>{
    spawn_blocking_with_tracing(move || {
        conn.transaction::<CoverageArea, AddCoverageAreaError, _>(|conn| {
            // Additions for one vendor are serialized on its row
            vendors::table
                .find(vendor_id)
                .select(vendors::id)
                .for_update()
                .first::<Uuid>(conn)?;

            let province = find_province(conn, &request.province_id)?;
            let regency = match &request.regency_id {
                Some(id) => find_regency(conn, id)?,
                None => None
            };
            let district = match &request.district_id {
                Some(id) => find_district(conn, id)?,
                None => None
            };

            let existing = load_coverage_areas(conn, vendor_id)?;
            let regions = ResolvedRegions{
                province: province.as_ref(),
                regency: regency.as_ref(),
                district: district.as_ref()
            };

            validate_coverage_area(&request, &regions, &existing)?;

            let area = CoverageArea{
                id: Uuid::new_v4(),
                vendor_id,
                province_id: request.province_id,
                regency_id: request.regency_id,
                district_id: request.district_id,
                custom_radius_km: request.custom_radius_km,
                created_at: Utc::now()
            };

            Ok(diesel::insert_into(coverage_areas::table)
                .values(&area)
                .returning(CoverageArea::as_returning())
                .get_result::<CoverageArea>(conn)?)
        })
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting coverage area",
    skip(conn)
)]
pub async fn get_coverage_area(
    mut conn: DbConnection,
    area_id: Uuid
) -> Result<Option<CoverageArea>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        coverage_areas::table
            .find(area_id)
            .select(CoverageArea::as_select())
            .first::<CoverageArea>(&mut conn)
            .optional()
            .context("Failed to get coverage area")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Deleting coverage area",
    skip(conn)
)]
pub async fn delete_coverage_area(
    mut conn: DbConnection,
    area_id: Uuid
) -> Result<bool, anyhow::Error>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::delete(coverage_areas::table.find(area_id))
            .execute(&mut conn)
            .context("Failed to delete coverage area")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected_rows > 0)
}
