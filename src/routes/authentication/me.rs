use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Serialize;

use crate::{auth::AuthenticatedUser, db_interaction::{get_user_by_id, get_vendor_by_user_id}, models::{UserProfileInfo, Vendor}, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::AuthenticationError;

#[derive(Serialize)]
pub struct CurrentUser{
    pub user: UserProfileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>
}

#[tracing::instrument(
    "Getting current user",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn me(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser
) -> Result<HttpResponse, AuthenticationError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let account = get_user_by_id(conn, user.user_id)
        .await?
        .ok_or(AuthenticationError::UserNotFound)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vendor = get_vendor_by_user_id(conn, user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Current user",
        CurrentUser{
            user: account.into(),
            vendor
        }
    )))
}
