use anyhow::Context;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::{models::{District, Province, Regency}, schema::{districts, provinces, regencies}, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

#[tracing::instrument(
    "Listing provinces",
    skip(conn)
)]
pub async fn list_provinces(
    mut conn: DbConnection
) -> Result<Vec<Province>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        provinces::table
            .select(Province::as_select())
            .order(provinces::id.asc())
            .load::<Province>(&mut conn)
            .context("Failed to list provinces")
    })
    .await
    .context("Failed due to threadpool error")?
}

// None when the province itself does not exist
#[tracing::instrument(
    "Listing regencies of province",
    skip(conn)
)]
pub async fn list_regencies(
    mut conn: DbConnection,
    province_id: String
) -> Result<Option<Vec<Regency>>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        let exists = find_province(&mut conn, &province_id)?.is_some();
        if !exists {
            return Ok(None)
        }

        regencies::table
            .filter(regencies::province_id.eq(province_id))
            .select(Regency::as_select())
            .order(regencies::id.asc())
            .load::<Regency>(&mut conn)
            .map(Some)
            .context("Failed to list regencies")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Listing districts of regency",
    skip(conn)
)]
pub async fn list_districts(
    mut conn: DbConnection,
    regency_id: String
) -> Result<Option<Vec<District>>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        let exists = find_regency(&mut conn, &regency_id)?.is_some();
        if !exists {
            return Ok(None)
        }

        districts::table
            .filter(districts::regency_id.eq(regency_id))
            .select(District::as_select())
            .order(districts::id.asc())
            .load::<District>(&mut conn)
            .map(Some)
            .context("Failed to list districts")
    })
    .await
    .context("Failed due to threadpool error")?
}

pub fn find_province(conn: &mut DbConnection, province_id: &str) -> Result<Option<Province>, anyhow::Error>{
    provinces::table
        .filter(provinces::id.eq(province_id))
        .select(Province::as_select())
        .first::<Province>(conn)
        .optional()
        .context("Failed to get province")
}

pub fn find_regency(conn: &mut DbConnection, regency_id: &str) -> Result<Option<Regency>, anyhow::Error>{
    regencies::table
        .filter(regencies::id.eq(regency_id))
        .select(Regency::as_select())
        .first::<Regency>(conn)
        .optional()
        .context("Failed to get regency")
}

pub fn find_district(conn: &mut DbConnection, district_id: &str) -> Result<Option<District>, anyhow::Error>{
    districts::table
        .filter(districts::id.eq(district_id))
        .select(District::as_select())
        .first::<District>(conn)
        .optional()
        .context("Failed to get district")
}
