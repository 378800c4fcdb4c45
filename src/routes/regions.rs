use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use thiserror::Error;

use crate::{db_interaction, response::{error_response, ApiResponse}, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

pub fn regions_config(cfg: &mut web::ServiceConfig){
    cfg.service(
        web::scope("/regions")
            .route("/provinces", web::get().to(list_provinces))
            .route("/provinces/{id}/regencies", web::get().to(list_regencies))
            .route("/regencies/{id}/districts", web::get().to(list_districts))
    );
}

#[derive(Error)]
pub enum RegionError{
    #[error("Province not found")]
    ProvinceNotFound,
    #[error("Regency not found")]
    RegencyNotFound,
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegionError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegionError::ProvinceNotFound | RegionError::RegencyNotFound => StatusCode::NOT_FOUND,
            RegionError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    "Listing provinces",
    skip(pool)
)]
pub async fn list_provinces(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, RegionError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let provinces = db_interaction::list_provinces(conn).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Provinces fetched", provinces)))
}

#[tracing::instrument(
    "Listing regencies",
    skip(pool)
)]
pub async fn list_regencies(
    pool: web::Data<DbPool>,
    path: web::Path<String>
) -> Result<HttpResponse, RegionError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let regencies = db_interaction::list_regencies(conn, path.into_inner())
        .await?
        .ok_or(RegionError::ProvinceNotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Regencies fetched", regencies)))
}

#[tracing::instrument(
    "Listing districts",
    skip(pool)
)]
pub async fn list_districts(
    pool: web::Data<DbPool>,
    path: web::Path<String>
) -> Result<HttpResponse, RegionError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let districts = db_interaction::list_districts(conn, path.into_inner())
        .await?
        .ok_or(RegionError::RegencyNotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Districts fetched", districts)))
}
